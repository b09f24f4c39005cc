//! Backtracking cursor over a finished token list
//!
//! The recognizer reads tokens through this cursor. Rules take a mark before
//! trying an alternative and reset to it when the alternative does not apply.

use crate::tokens::{Token, TokenKind};
use crate::utils::{SourceMap, Span};

/// Cursor over tokens ending in `End`.
///
/// Reading past the end keeps returning the final `End` token, so rules never
/// have to special-case exhaustion.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    /// Index of the current (not yet consumed) token
    position: usize,
    source_map: Option<SourceMap>,
}

impl TokenStream {
    /// Create a stream; an `End` token is appended when the list lacks one
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_end) {
            let (line, offset) = tokens
                .last()
                .map(|t| (t.line, t.span.end))
                .unwrap_or((1, 0));
            tokens.push(Token::simple(TokenKind::End, line, Span::empty(offset)));
        }

        crate::log_debug!("Token stream created",
            "token_count" => tokens.len()
        );

        Self {
            tokens,
            position: 0,
            source_map: None,
        }
    }

    /// Create stream with source map for caret diagnostics
    pub fn with_source_map(tokens: Vec<Token>, source_map: SourceMap) -> Self {
        let mut stream = Self::new(tokens);
        stream.source_map = Some(source_map);
        stream
    }

    // === NAVIGATION ===

    /// The current token
    pub fn current(&self) -> &Token {
        let index = self.position.min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    /// Step past the current token and return it
    pub fn advance(&mut self) -> &Token {
        let index = self.position.min(self.tokens.len() - 1);
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        &self.tokens[index]
    }

    /// Whether the current token has the given kind
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Consume the current token if it has the given kind
    pub fn consume(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance().clone())
        } else {
            None
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.current().is_end()
    }

    // === BACKTRACKING ===

    /// Save the current position
    pub fn mark(&self) -> usize {
        self.position
    }

    /// Return to a position saved by [`mark`](Self::mark)
    pub fn reset(&mut self, mark: usize) {
        self.position = mark.min(self.tokens.len() - 1);
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    // === DIAGNOSTICS ===

    /// Format a message against the source, when a source map is attached
    pub fn format_error(&self, span: Span, message: &str) -> String {
        match &self.source_map {
            Some(source_map) => source_map.format_error(&span, message),
            None => format!("error at {}: {}", span, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TokenStream {
        // int x ;
        TokenStream::new(vec![
            Token::simple(TokenKind::Int, 1, Span::new(0, 3)),
            Token::identifier("x".into(), 1, Span::new(4, 5)),
            Token::simple(TokenKind::Semicolon, 1, Span::new(5, 6)),
            Token::simple(TokenKind::End, 1, Span::empty(6)),
        ])
    }

    #[test]
    fn test_consume_and_check() {
        let mut stream = sample();

        assert!(stream.check(TokenKind::Int));
        assert!(stream.consume(TokenKind::Id).is_none());
        assert_eq!(stream.position(), 0);

        assert!(stream.consume(TokenKind::Int).is_some());
        let name = stream.consume(TokenKind::Id).unwrap();
        assert_eq!(name.name(), Some("x"));
        assert!(stream.check(TokenKind::Semicolon));
    }

    #[test]
    fn test_mark_and_reset() {
        let mut stream = sample();
        let mark = stream.mark();

        stream.advance();
        stream.advance();
        assert!(stream.check(TokenKind::Semicolon));

        stream.reset(mark);
        assert!(stream.check(TokenKind::Int));
    }

    #[test]
    fn test_end_is_sticky() {
        let mut stream = sample();
        for _ in 0..10 {
            stream.advance();
        }
        assert!(stream.is_at_end());
        assert!(stream.advance().is_end());
        assert_eq!(stream.position(), 3);
    }

    #[test]
    fn test_missing_end_is_appended() {
        let stream = TokenStream::new(vec![Token::int(1, 2, Span::new(0, 1))]);
        assert_eq!(stream.len(), 2);
        assert!(stream.tokens()[1].is_end());
        assert_eq!(stream.tokens()[1].line, 2);

        let empty = TokenStream::new(Vec::new());
        assert!(empty.is_at_end());
    }

    #[test]
    fn test_format_error_uses_source_map() {
        let source = b"int x";
        let stream = TokenStream::with_source_map(Vec::new(), SourceMap::new(source));
        let rendered = stream.format_error(Span::new(4, 5), "expected `;`");
        assert!(rendered.contains("1 | int x"));

        let plain = TokenStream::new(Vec::new());
        assert_eq!(plain.format_error(Span::new(4, 5), "oops"), "error at 4..5: oops");
    }
}
