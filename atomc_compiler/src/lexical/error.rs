//! Lexical errors

use crate::config::compile_time::lexical::*;
use crate::logging::codes;

/// Reasons a byte sequence cannot form a token.
///
/// `offset` is the byte offset where the rejected token starts and `line`
/// is the line counter at the point of rejection.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("invalid character '{}'", .byte.escape_ascii())]
    InvalidCharacter { byte: u8, line: u32, offset: usize },

    #[error("malformed number '{text}'")]
    MalformedNumber {
        text: String,
        line: u32,
        offset: usize,
    },

    #[error("unterminated string literal")]
    UnterminatedString { line: u32, offset: usize },

    #[error("invalid character literal")]
    InvalidCharLiteral { line: u32, offset: usize },

    #[error("invalid escape sequence '\\{}'", .escape.escape_ascii())]
    InvalidEscape { escape: u8, line: u32, offset: usize },

    #[error("unterminated block comment")]
    UnterminatedComment { line: u32, offset: usize },

    #[error("incomplete operator '{operator}', expected '{operator}{operator}'")]
    IncompleteOperator {
        operator: char,
        line: u32,
        offset: usize,
    },

    #[error("too many tokens (max {MAX_TOKEN_COUNT})")]
    TokenLimitExceeded { line: u32, offset: usize },

    #[error("identifier too long: {length} characters (max {MAX_IDENTIFIER_LENGTH})")]
    IdentifierTooLong {
        length: usize,
        line: u32,
        offset: usize,
    },

    #[error("string literal too large: {size} bytes (max {MAX_STRING_SIZE})")]
    StringTooLarge {
        size: usize,
        line: u32,
        offset: usize,
    },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::InvalidCharacter { .. } => codes::lexical::INVALID_CHARACTER,
            LexerError::MalformedNumber { .. } => codes::lexical::MALFORMED_NUMBER,
            LexerError::UnterminatedString { .. } => codes::lexical::UNTERMINATED_STRING,
            LexerError::InvalidCharLiteral { .. } => codes::lexical::INVALID_CHAR_LITERAL,
            LexerError::InvalidEscape { .. } => codes::lexical::INVALID_ESCAPE,
            LexerError::UnterminatedComment { .. } => codes::lexical::UNTERMINATED_COMMENT,
            LexerError::IncompleteOperator { .. } => codes::lexical::INCOMPLETE_OPERATOR,
            LexerError::TokenLimitExceeded { .. } => codes::lexical::TOO_MANY_TOKENS,
            LexerError::IdentifierTooLong { .. } => codes::lexical::IDENTIFIER_TOO_LONG,
            LexerError::StringTooLarge { .. } => codes::lexical::STRING_TOO_LARGE,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            LexerError::InvalidCharacter { line, .. }
            | LexerError::MalformedNumber { line, .. }
            | LexerError::UnterminatedString { line, .. }
            | LexerError::InvalidCharLiteral { line, .. }
            | LexerError::InvalidEscape { line, .. }
            | LexerError::UnterminatedComment { line, .. }
            | LexerError::IncompleteOperator { line, .. }
            | LexerError::TokenLimitExceeded { line, .. }
            | LexerError::IdentifierTooLong { line, .. }
            | LexerError::StringTooLarge { line, .. } => *line,
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            LexerError::InvalidCharacter { offset, .. }
            | LexerError::MalformedNumber { offset, .. }
            | LexerError::UnterminatedString { offset, .. }
            | LexerError::InvalidCharLiteral { offset, .. }
            | LexerError::InvalidEscape { offset, .. }
            | LexerError::UnterminatedComment { offset, .. }
            | LexerError::IncompleteOperator { offset, .. }
            | LexerError::TokenLimitExceeded { offset, .. }
            | LexerError::IdentifierTooLong { offset, .. }
            | LexerError::StringTooLarge { offset, .. } => *offset,
        }
    }

    /// The one-line diagnostic printed by the driver
    pub fn diagnostic(&self) -> String {
        format!("error in line {}: {}", self.line(), self)
    }
}
