//! Syntax analysis: accept or reject a token stream as an AtomC unit
//!
//! The recognizer builds a [`Unit`] on success and stops at the first
//! committed mismatch with a [`SyntaxError`].

pub mod error;
pub mod parser;

pub use error::{SyntaxError, SyntaxErrorCause, SyntaxResult};
pub use parser::Parser;

use crate::config::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::config::runtime::SyntaxPreferences;
use crate::grammar::ast::Unit;
use crate::logging::{self, codes, LogEvent};
use crate::tokens::TokenStream;
use crate::{log_debug, log_success};

/// Parse a whole unit with default preferences
pub fn parse_unit(tokens: TokenStream) -> SyntaxResult<Unit> {
    parse_unit_with_preferences(tokens, &SyntaxPreferences::default())
}

pub fn parse_unit_with_preferences(
    tokens: TokenStream,
    preferences: &SyntaxPreferences,
) -> SyntaxResult<Unit> {
    let mut parser = Parser::with_preferences(tokens, preferences);

    match parser.parse_unit() {
        Ok(unit) => {
            log_success!(codes::success::PARSE_COMPLETE, "Syntax analysis completed",
                "items" => unit.items.len(),
                "backtracks" => parser.backtrack_count(),
                "max_depth" => parser.max_depth_reached()
            );
            Ok(unit)
        }
        Err(error) => {
            if logging::config::get_min_log_level() >= logging::LogLevel::Debug {
                logging::log_event(rejection_event(&error, parser.tokens()));
            }
            Err(error)
        }
    }
}

/// Debug record of a rejected unit; the caller prints the diagnostic itself
fn rejection_event(error: &SyntaxError, tokens: &TokenStream) -> LogEvent {
    LogEvent::debug(&error.to_string())
        .with_span(error.span)
        .with_context("code", error.error_code().as_str())
        .with_context("token", error.kind.name())
        .with_context("source", &tokens.format_error(error.span, &error.message))
}

/// Check that every syntax code is registered
pub fn init_syntax_logging() -> Result<(), String> {
    codes::ensure_registered(&[
        codes::syntax::EXPECTED_TOKEN,
        codes::syntax::TOP_LEVEL_ERROR,
        codes::syntax::MAX_RECURSION_DEPTH,
        codes::success::PARSE_COMPLETE,
    ])?;

    log_debug!("Syntax limits initialized", "max_parse_depth" => MAX_PARSE_DEPTH);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;
    use assert_matches::assert_matches;

    #[test]
    fn test_init_logging() {
        assert!(init_syntax_logging().is_ok());
    }

    #[test]
    fn test_parse_unit() {
        let unit = parse_unit(tokenize(b"int v[10]; void main() { v[0] = 1; }").unwrap()).unwrap();
        assert_eq!(unit.items.len(), 2);
    }

    #[test]
    fn test_parse_unit_reports_cause() {
        let error = parse_unit(tokenize(b"int main() { return 0; } 5").unwrap()).unwrap_err();

        assert_eq!(error.cause, SyntaxErrorCause::TopLevel);
        assert_matches!(error.found, Some(crate::tokens::TokenValue::Int(5)));
    }

    #[test]
    fn test_rejection_is_logged_at_debug_level() {
        let tokens = tokenize(b"int x").unwrap();
        let error = Parser::new(tokens.clone()).parse_unit().unwrap_err();
        let event = rejection_event(&error, &tokens);

        assert!(event.is_debug());
        assert!(!event.is_error());
        assert_eq!(event.message, "error in line 1: expected `;`");
        assert_eq!(
            event.context.get("code").map(String::as_str),
            Some(error.error_code().as_str())
        );
        assert!(event.context["source"].contains("int x"));
    }

    #[test]
    fn test_empty_source_is_a_valid_unit() {
        let unit = parse_unit(tokenize(b"  // nothing\n").unwrap()).unwrap();
        assert!(unit.items.is_empty());
    }
}
