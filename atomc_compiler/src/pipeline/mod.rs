//! Stage driver: file -> lexical -> syntax
//!
//! Each stage stops at its first error, which is carried out as a
//! [`PipelineError`] for the caller to report.

mod error;
mod result;
mod validation;

pub use error::PipelineError;
pub use result::{PipelineResult, TokenDump};
pub use validation::validate_pipeline;

use crate::config::runtime::RuntimeConfig;
use crate::file_processor::FileProcessor;
use crate::lexical::{LexicalAnalyzer, Lexer};
use crate::logging;
use std::path::PathBuf;
use std::time::Instant;

/// Tokenize a file for the dump mode with default preferences
pub fn tokenize_file(file_path: &str) -> Result<TokenDump, PipelineError> {
    tokenize_file_with_config(file_path, &RuntimeConfig::default())
}

/// Tokenize a file, keeping the tokens that precede a lexical error
pub fn tokenize_file_with_config(
    file_path: &str,
    config: &RuntimeConfig,
) -> Result<TokenDump, PipelineError> {
    logging::with_file_context(PathBuf::from(file_path), 0, || {
        crate::log_info!("Tokenizing AtomC file", "file" => file_path);

        let file_result = FileProcessor::from_preferences(&config.file_processor)
            .process_file(file_path)?;
        let (tokens, error) = Lexer::new(&file_result.source).tokenize_partial();

        if let Some(error) = &error {
            crate::log_debug!("Token dump stopped at a lexical error",
                "code" => error.error_code(),
                "line" => error.line(),
                "tokens_before_error" => tokens.len()
            );
        }

        Ok(TokenDump {
            tokens,
            error,
            file_metadata: file_result.metadata,
        })
    })
}

/// Run a file through every stage with default preferences
pub fn process_file(file_path: &str) -> Result<PipelineResult, PipelineError> {
    process_file_with_config(file_path, &RuntimeConfig::default())
}

pub fn process_file_with_config(
    file_path: &str,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();

    logging::with_file_context(PathBuf::from(file_path), 0, || {
        crate::log_info!("Starting AtomC pipeline", "file" => file_path);

        // Stage 1: File processing
        let file_result = FileProcessor::from_preferences(&config.file_processor)
            .process_file(file_path)?;

        // Stage 2: Lexical analysis
        let mut analyzer = LexicalAnalyzer::with_preferences(config.lexical.clone());
        let tokens = analyzer.tokenize_source(&file_result.source)?;
        let token_count = tokens.len();

        // Stage 3: Syntax analysis
        let unit = crate::syntax::parse_unit_with_preferences(tokens, &config.syntax)?;

        let result = PipelineResult::new(
            unit,
            file_result.metadata,
            analyzer.metrics().clone(),
            token_count,
            start_time.elapsed(),
        );
        result.log_success(file_path);

        Ok(result)
    })
}
