//! Token kinds and the keyword table
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every kind of token the AtomC tokenizer can emit.
///
/// The variant names double as the display names used in the token table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals and names
    CtReal,
    CtInt,
    CtChar,
    CtString,
    Id,
    End,

    // Operators and punctuation
    Div,
    Add,
    Sub,
    Mul,
    Dot,
    And,
    Or,
    Not,
    NotEq,
    Equal,
    Assign,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Comma,
    Semicolon,
    Lpar,
    Rpar,
    Lbracket,
    Rbracket,
    Lacc,
    Racc,

    /// Lexically invalid input
    Error,

    // Keywords
    Break,
    Char,
    Double,
    Else,
    For,
    If,
    Int,
    Return,
    Struct,
    Void,
    While,
}

/// Keyword spellings, matched exactly (case-sensitive)
pub const KEYWORDS: [(&str, TokenKind); 11] = [
    ("break", TokenKind::Break),
    ("char", TokenKind::Char),
    ("double", TokenKind::Double),
    ("else", TokenKind::Else),
    ("for", TokenKind::For),
    ("if", TokenKind::If),
    ("int", TokenKind::Int),
    ("return", TokenKind::Return),
    ("struct", TokenKind::Struct),
    ("void", TokenKind::Void),
    ("while", TokenKind::While),
];

/// Look up a keyword by its exact spelling
pub fn keyword_kind(text: &str) -> Option<TokenKind> {
    KEYWORDS
        .iter()
        .find(|(spelling, _)| *spelling == text)
        .map(|(_, kind)| *kind)
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::CtReal => "CtReal",
            TokenKind::CtInt => "CtInt",
            TokenKind::CtChar => "CtChar",
            TokenKind::CtString => "CtString",
            TokenKind::Id => "Id",
            TokenKind::End => "End",
            TokenKind::Div => "Div",
            TokenKind::Add => "Add",
            TokenKind::Sub => "Sub",
            TokenKind::Mul => "Mul",
            TokenKind::Dot => "Dot",
            TokenKind::And => "And",
            TokenKind::Or => "Or",
            TokenKind::Not => "Not",
            TokenKind::NotEq => "NotEq",
            TokenKind::Equal => "Equal",
            TokenKind::Assign => "Assign",
            TokenKind::Less => "Less",
            TokenKind::LessEq => "LessEq",
            TokenKind::Greater => "Greater",
            TokenKind::GreaterEq => "GreaterEq",
            TokenKind::Comma => "Comma",
            TokenKind::Semicolon => "Semicolon",
            TokenKind::Lpar => "Lpar",
            TokenKind::Rpar => "Rpar",
            TokenKind::Lbracket => "Lbracket",
            TokenKind::Rbracket => "Rbracket",
            TokenKind::Lacc => "Lacc",
            TokenKind::Racc => "Racc",
            TokenKind::Error => "Error",
            TokenKind::Break => "Break",
            TokenKind::Char => "Char",
            TokenKind::Double => "Double",
            TokenKind::Else => "Else",
            TokenKind::For => "For",
            TokenKind::If => "If",
            TokenKind::Int => "Int",
            TokenKind::Return => "Return",
            TokenKind::Struct => "Struct",
            TokenKind::Void => "Void",
            TokenKind::While => "While",
        }
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Break
                | TokenKind::Char
                | TokenKind::Double
                | TokenKind::Else
                | TokenKind::For
                | TokenKind::If
                | TokenKind::Int
                | TokenKind::Return
                | TokenKind::Struct
                | TokenKind::Void
                | TokenKind::While
        )
    }

    /// Kinds whose tokens carry a literal payload
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::CtReal | TokenKind::CtInt | TokenKind::CtChar | TokenKind::CtString
        )
    }

    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Div
                | TokenKind::Add
                | TokenKind::Sub
                | TokenKind::Mul
                | TokenKind::Dot
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Not
                | TokenKind::NotEq
                | TokenKind::Equal
                | TokenKind::Assign
                | TokenKind::Less
                | TokenKind::LessEq
                | TokenKind::Greater
                | TokenKind::GreaterEq
        )
    }

    /// Source spelling for fixed-text kinds
    pub fn spelling(&self) -> Option<&'static str> {
        let text = match self {
            TokenKind::Div => "/",
            TokenKind::Add => "+",
            TokenKind::Sub => "-",
            TokenKind::Mul => "*",
            TokenKind::Dot => ".",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            TokenKind::Not => "!",
            TokenKind::NotEq => "!=",
            TokenKind::Equal => "==",
            TokenKind::Assign => "=",
            TokenKind::Less => "<",
            TokenKind::LessEq => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEq => ">=",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Lpar => "(",
            TokenKind::Rpar => ")",
            TokenKind::Lbracket => "[",
            TokenKind::Rbracket => "]",
            TokenKind::Lacc => "{",
            TokenKind::Racc => "}",
            kind if kind.is_keyword() => {
                return KEYWORDS
                    .iter()
                    .find(|(_, k)| k == kind)
                    .map(|(spelling, _)| *spelling)
            }
            _ => return None,
        };
        Some(text)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_is_case_sensitive() {
        assert_eq!(keyword_kind("while"), Some(TokenKind::While));
        assert_eq!(keyword_kind("struct"), Some(TokenKind::Struct));
        assert_eq!(keyword_kind("While"), None);
        assert_eq!(keyword_kind("INT"), None);
        assert_eq!(keyword_kind("integer"), None);
    }

    #[test]
    fn test_every_keyword_classifies_as_keyword() {
        for (spelling, kind) in KEYWORDS {
            assert!(kind.is_keyword());
            assert_eq!(kind.spelling(), Some(spelling));
        }
    }

    #[test]
    fn test_classifiers() {
        assert!(TokenKind::CtString.is_literal());
        assert!(!TokenKind::Id.is_literal());
        assert!(TokenKind::GreaterEq.is_operator());
        assert!(!TokenKind::Semicolon.is_operator());
        assert_eq!(TokenKind::Semicolon.spelling(), Some(";"));
        assert_eq!(TokenKind::Id.spelling(), None);
    }

    #[test]
    fn test_display_uses_table_name() {
        assert_eq!(TokenKind::LessEq.to_string(), "LessEq");
        assert_eq!(TokenKind::CtInt.to_string(), "CtInt");
    }
}
