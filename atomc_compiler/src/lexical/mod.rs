//! Lexical analysis for AtomC sources
//!
//! [`dfa`] holds the byte automaton behind [`next_token`] and [`Lexer`].
//! [`LexicalAnalyzer`] wraps it with the compile-time limits, metrics and
//! coded logging used by the pipeline. [`render_token_table`] produces the
//! dump printed in token mode.

pub mod analyzer;
pub mod dfa;
pub mod error;
pub mod table;

use crate::config::compile_time::lexical::*;
use crate::logging::codes;
use crate::tokens::{Token, TokenStream};

pub use analyzer::{count_comments, LexicalAnalyzer, LexicalMetrics};
pub use dfa::{next_token, Lexer};
pub use error::LexerError;
pub use table::render_token_table;

/// Tokenize a buffer with default preferences
pub fn tokenize(source: &[u8]) -> Result<TokenStream, LexerError> {
    LexicalAnalyzer::new().tokenize_source(source)
}

/// Every token up to and including the first `Error` or `End`
pub fn tokenize_lossy(source: &[u8]) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Check that every lexical code is registered
pub fn init_lexical_analysis_logging() -> Result<(), String> {
    codes::ensure_registered(&[
        codes::lexical::INVALID_CHARACTER,
        codes::lexical::UNTERMINATED_STRING,
        codes::lexical::MALFORMED_NUMBER,
        codes::lexical::IDENTIFIER_TOO_LONG,
        codes::lexical::STRING_TOO_LARGE,
        codes::lexical::INVALID_CHAR_LITERAL,
        codes::lexical::INVALID_ESCAPE,
        codes::lexical::TOO_MANY_TOKENS,
        codes::lexical::UNTERMINATED_COMMENT,
        codes::lexical::INCOMPLETE_OPERATOR,
        codes::success::TOKENIZATION_COMPLETE,
    ])?;

    crate::log_debug!("Lexical limits initialized",
        "max_string_size" => MAX_STRING_SIZE,
        "max_identifier_length" => MAX_IDENTIFIER_LENGTH,
        "max_token_count" => MAX_TOKEN_COUNT
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{TokenKind, TokenValue};
    use assert_matches::assert_matches;

    #[test]
    fn test_init_logging() {
        assert!(init_lexical_analysis_logging().is_ok());
    }

    #[test]
    fn test_tokenize_ends_with_single_end() {
        let stream = tokenize(b"int x; void main(){ return; }").unwrap();
        let tokens = stream.tokens();

        assert!(tokens.last().unwrap().is_end());
        assert_eq!(tokens.iter().filter(|t| t.is_end()).count(), 1);
    }

    #[test]
    fn test_numeric_values() {
        for (source, expected) in [
            (&b"0x1A"[..], TokenValue::Int(26)),
            (&b"017"[..], TokenValue::Int(15)),
            (&b"42"[..], TokenValue::Int(42)),
        ] {
            let stream = tokenize(source).unwrap();
            assert_eq!(stream.tokens()[0].value(), &expected);
        }

        let stream = tokenize(b"3.14e-2").unwrap();
        assert_matches!(stream.tokens()[0].value(), TokenValue::Real(v) if (v - 0.0314).abs() < 1e-12);
    }

    #[test]
    fn test_lossy_stops_at_error() {
        let tokens = tokenize_lossy(b"int 0x;");
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();

        assert_eq!(kinds, vec![TokenKind::Int, TokenKind::Error]);
        assert_matches!(tokenize(b"int 0x;"), Err(LexerError::MalformedNumber { .. }));
    }

    #[test]
    fn test_round_trip_over_spans() {
        let source = b"struct P { int x; };\n/* c */ double f(char s[]) { return s[0] / 2.5e1; } // end\n";
        let tokens = tokenize_lossy(source);

        let mut rebuilt = Vec::new();
        let mut cursor = 0;
        for token in &tokens {
            rebuilt.extend_from_slice(&source[cursor..token.span.start]);
            rebuilt.extend_from_slice(token.span.slice(source));
            cursor = token.span.end;
        }
        rebuilt.extend_from_slice(&source[cursor.min(source.len())..]);

        assert_eq!(rebuilt, source.to_vec());
    }
}
