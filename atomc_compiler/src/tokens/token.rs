//! Tokens and their literal payloads
use super::kind::TokenKind;
use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal payload carried by a token.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum TokenValue {
    #[default]
    None,
    Int(i64),
    Real(f64),
    Char(u8),
    Text(String),
}

impl TokenValue {
    pub fn is_none(&self) -> bool {
        matches!(self, TokenValue::None)
    }

    /// Rendering used in diagnostics: text and characters are quoted
    pub fn describe(&self) -> String {
        match self {
            TokenValue::None => String::new(),
            TokenValue::Int(value) => value.to_string(),
            TokenValue::Real(value) => value.to_string(),
            TokenValue::Char(byte) => format!("{:?}", *byte as char),
            TokenValue::Text(text) => format!("{:?}", text),
        }
    }
}

/// Natural textual form, as printed in the token table
impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::None => Ok(()),
            TokenValue::Int(value) => write!(f, "{}", value),
            TokenValue::Real(value) => write!(f, "{}", value),
            TokenValue::Char(byte) => write!(f, "{}", *byte as char),
            TokenValue::Text(text) => f.write_str(text),
        }
    }
}

/// A single token with its 1-based line and source byte range.
///
/// The payload is only reachable through the kind-specific constructors, so
/// a token carries a value exactly when its kind is a literal or `Id`.
/// Tokens are serialized for output but never rebuilt from data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    value: TokenValue,
    pub line: u32,
    pub span: Span,
}

impl Token {
    /// Token without a payload (punctuation, operators, keywords, `End`, `Error`).
    ///
    /// A literal or `Id` kind has no value to carry here and becomes `Error`.
    pub(crate) fn simple(kind: TokenKind, line: u32, span: Span) -> Self {
        let kind = if kind.is_literal() || kind == TokenKind::Id {
            TokenKind::Error
        } else {
            kind
        };
        Self {
            kind,
            value: TokenValue::None,
            line,
            span,
        }
    }

    pub fn int(value: i64, line: u32, span: Span) -> Self {
        Self {
            kind: TokenKind::CtInt,
            value: TokenValue::Int(value),
            line,
            span,
        }
    }

    pub fn real(value: f64, line: u32, span: Span) -> Self {
        Self {
            kind: TokenKind::CtReal,
            value: TokenValue::Real(value),
            line,
            span,
        }
    }

    pub fn char(value: u8, line: u32, span: Span) -> Self {
        Self {
            kind: TokenKind::CtChar,
            value: TokenValue::Char(value),
            line,
            span,
        }
    }

    pub fn string(value: String, line: u32, span: Span) -> Self {
        Self {
            kind: TokenKind::CtString,
            value: TokenValue::Text(value),
            line,
            span,
        }
    }

    pub fn identifier(name: String, line: u32, span: Span) -> Self {
        Self {
            kind: TokenKind::Id,
            value: TokenValue::Text(name),
            line,
            span,
        }
    }

    pub fn value(&self) -> &TokenValue {
        &self.value
    }

    /// Identifier name, if this is an `Id`
    pub fn name(&self) -> Option<&str> {
        match (&self.kind, &self.value) {
            (TokenKind::Id, TokenValue::Text(name)) => Some(name),
            _ => None,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::End
    }

    pub fn is_error(&self) -> bool {
        self.kind == TokenKind::Error
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_none() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}({})", self.kind, self.value.describe())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_pair_kind_and_value() {
        let span = Span::new(0, 2);

        assert_eq!(Token::int(42, 1, span).value(), &TokenValue::Int(42));
        assert_eq!(Token::real(0.5, 1, span).kind, TokenKind::CtReal);
        assert_eq!(Token::char(b'a', 1, span).value(), &TokenValue::Char(b'a'));
        assert_eq!(Token::string("hi".into(), 1, span).kind, TokenKind::CtString);
        assert!(Token::simple(TokenKind::Semicolon, 1, span).value().is_none());
    }

    #[test]
    fn test_simple_refuses_payload_kinds() {
        let span = Span::new(0, 1);

        for kind in [
            TokenKind::Id,
            TokenKind::CtInt,
            TokenKind::CtReal,
            TokenKind::CtChar,
            TokenKind::CtString,
        ] {
            let token = Token::simple(kind, 1, span);
            assert_eq!(token.kind, TokenKind::Error, "kind: {}", kind.name());
            assert!(token.value().is_none());
        }
        assert_eq!(Token::simple(TokenKind::While, 1, span).kind, TokenKind::While);
    }

    #[test]
    fn test_serializes_kind_with_value() {
        let json = serde_json::to_value(Token::int(5, 2, Span::new(0, 1))).unwrap();
        assert_eq!(json["kind"], "CtInt");
        assert_eq!(json["value"]["Int"], 5);
        assert_eq!(json["line"], 2);
    }

    #[test]
    fn test_identifier_name() {
        let token = Token::identifier("counter".into(), 3, Span::new(0, 7));
        assert_eq!(token.name(), Some("counter"));
        assert_eq!(Token::string("counter".into(), 3, Span::new(0, 9)).name(), None);
    }

    #[test]
    fn test_value_rendering() {
        assert_eq!(TokenValue::Char(b'x').to_string(), "x");
        assert_eq!(TokenValue::Char(b'x').describe(), "'x'");
        assert_eq!(TokenValue::Text("a b".into()).to_string(), "a b");
        assert_eq!(TokenValue::Text("a b".into()).describe(), "\"a b\"");
        assert_eq!(TokenValue::Real(3.25).to_string(), "3.25");
        assert_eq!(TokenValue::Int(-7).describe(), "-7");
    }

    #[test]
    fn test_token_display() {
        let span = Span::new(0, 1);
        assert_eq!(Token::simple(TokenKind::Lpar, 1, span).to_string(), "Lpar");
        assert_eq!(Token::int(26, 1, span).to_string(), "CtInt(26)");
        assert_eq!(
            Token::identifier("x".into(), 1, span).to_string(),
            "Id(\"x\")"
        );
    }
}
