//! Syntax errors raised by the recognizer
//!
//! Every error is reported at the token the cursor stopped on: its line, its
//! kind and, for literals and identifiers, its value.

use crate::logging::{codes, Code};
use crate::tokens::{Token, TokenKind, TokenValue};
use crate::utils::Span;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// Why the recognizer stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorCause {
    /// A committed rule is missing a required token or construct
    Expected,
    /// The unit did not reach `End`
    TopLevel,
    /// Nesting exceeded the compile-time depth limit
    DepthExceeded,
}

pub const TOP_LEVEL_ERROR: &str = "top level error";
pub const DEPTH_EXCEEDED: &str = "maximum nesting depth exceeded";

/// First fatal mismatch of a parse
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("error in line {line}: {message}{}", describe_found(.found))]
pub struct SyntaxError {
    pub line: u32,
    pub message: String,
    /// Value of the offending token, when it carries one
    pub found: Option<TokenValue>,
    /// Kind of the offending token
    pub kind: TokenKind,
    pub span: Span,
    pub cause: SyntaxErrorCause,
}

fn describe_found(found: &Option<TokenValue>) -> String {
    match found {
        Some(value) => format!(", found {}", value.describe()),
        None => String::new(),
    }
}

impl SyntaxError {
    /// Error located at `token`
    pub fn at(token: &Token, cause: SyntaxErrorCause, message: &str) -> Self {
        let value = token.value();
        Self {
            line: token.line,
            message: message.to_string(),
            found: (!value.is_none()).then(|| value.clone()),
            kind: token.kind,
            span: token.span,
            cause,
        }
    }

    pub fn expected(token: &Token, message: &str) -> Self {
        Self::at(token, SyntaxErrorCause::Expected, message)
    }

    pub fn top_level(token: &Token) -> Self {
        Self::at(token, SyntaxErrorCause::TopLevel, TOP_LEVEL_ERROR)
    }

    pub fn depth_exceeded(token: &Token) -> Self {
        Self::at(token, SyntaxErrorCause::DepthExceeded, DEPTH_EXCEEDED)
    }

    pub fn error_code(&self) -> Code {
        match self.cause {
            SyntaxErrorCause::Expected => codes::syntax::EXPECTED_TOKEN,
            SyntaxErrorCause::TopLevel => codes::syntax::TOP_LEVEL_ERROR,
            SyntaxErrorCause::DepthExceeded => codes::syntax::MAX_RECURSION_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_without_value() {
        let token = Token::simple(TokenKind::End, 1, Span::empty(5));
        let error = SyntaxError::expected(&token, "expected `;`");

        assert_eq!(error.to_string(), "error in line 1: expected `;`");
        assert_eq!(error.found, None);
        assert_eq!(error.kind, TokenKind::End);
    }

    #[test]
    fn test_found_values_are_quoted() {
        let id = Token::identifier("x".to_string(), 4, Span::new(0, 1));
        assert_eq!(
            SyntaxError::top_level(&id).to_string(),
            "error in line 4: top level error, found \"x\""
        );

        let ch = Token::char(b'a', 2, Span::new(0, 3));
        assert_eq!(
            SyntaxError::expected(&ch, "expected `;`").to_string(),
            "error in line 2: expected `;`, found 'a'"
        );

        let int = Token::int(7, 3, Span::new(0, 1));
        assert_eq!(
            SyntaxError::expected(&int, "expected identifier").to_string(),
            "error in line 3: expected identifier, found 7"
        );
    }

    #[test]
    fn test_error_codes() {
        let token = Token::simple(TokenKind::Semicolon, 1, Span::new(0, 1));

        assert_eq!(
            SyntaxError::expected(&token, "expected identifier").error_code(),
            codes::syntax::EXPECTED_TOKEN
        );
        assert_eq!(
            SyntaxError::top_level(&token).error_code(),
            codes::syntax::TOP_LEVEL_ERROR
        );
        assert_eq!(
            SyntaxError::depth_exceeded(&token).error_code(),
            codes::syntax::MAX_RECURSION_DEPTH
        );
    }
}
