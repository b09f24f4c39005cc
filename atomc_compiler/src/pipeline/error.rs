use crate::file_processor::FileProcessorError;
use crate::lexical::LexerError;
use crate::logging::Code;
use crate::syntax::SyntaxError;

/// Pipeline processing errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Lexical analysis failed: {0}")]
    LexicalAnalysis(#[from] LexerError),

    #[error("Syntax analysis failed: {0}")]
    SyntaxAnalysis(#[from] SyntaxError),
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            PipelineError::FileProcessing(error) => error.error_code(),
            PipelineError::LexicalAnalysis(error) => error.error_code(),
            PipelineError::SyntaxAnalysis(error) => error.error_code(),
        }
    }

    /// Whether the failure is in the program text rather than in reading it
    pub fn is_compile_error(&self) -> bool {
        !matches!(self, PipelineError::FileProcessing(_))
    }

    /// The single `error in line N: ...` line reported for compile errors
    pub fn diagnostic(&self) -> String {
        match self {
            PipelineError::FileProcessing(error) => error.to_string(),
            PipelineError::LexicalAnalysis(error) => error.diagnostic(),
            PipelineError::SyntaxAnalysis(error) => error.to_string(),
        }
    }
}
