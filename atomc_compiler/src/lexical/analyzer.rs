//! Lexical analyzer: drives the automaton over a whole file and keeps metrics

use super::dfa::Lexer;
use super::error::LexerError;
use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::file_processor::FileProcessingResult;
use crate::logging::codes;
use crate::tokens::{Token, TokenKind, TokenStream};
use crate::utils::SourceMap;
use crate::{log_debug, log_success};
use std::time::{Duration, Instant};

/// Counts collected over one tokenization
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LexicalMetrics {
    /// Every token, `End` included
    pub total_tokens: usize,
    pub identifiers: usize,
    pub keywords: usize,
    pub int_literals: usize,
    pub real_literals: usize,
    pub char_literals: usize,
    pub string_literals: usize,
    pub operators: usize,
    pub punctuation: usize,
    pub line_count: u32,
    /// Line and block comments skipped between tokens
    pub comment_count: usize,
    pub longest_identifier: usize,
    pub duration: Duration,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token) {
        self.total_tokens += 1;

        match token.kind {
            TokenKind::Id => {
                self.identifiers += 1;
                let length = token.name().map_or(0, str::len);
                self.longest_identifier = self.longest_identifier.max(length);
            }
            TokenKind::CtInt => self.int_literals += 1,
            TokenKind::CtReal => self.real_literals += 1,
            TokenKind::CtChar => self.char_literals += 1,
            TokenKind::CtString => self.string_literals += 1,
            kind if kind.is_keyword() => self.keywords += 1,
            kind if kind.is_operator() => self.operators += 1,
            TokenKind::End | TokenKind::Error => {}
            _ => self.punctuation += 1,
        }
    }

    pub fn literal_count(&self) -> usize {
        self.int_literals + self.real_literals + self.char_literals + self.string_literals
    }

    /// Average number of tokens per source line
    pub fn tokens_per_line(&self) -> f64 {
        if self.line_count == 0 {
            0.0
        } else {
            self.total_tokens as f64 / self.line_count as f64
        }
    }
}

/// Count the comments in the trivia between consecutive token spans
pub fn count_comments(source: &[u8], tokens: &[Token]) -> usize {
    let mut count = 0;
    let mut gap_start = 0;

    for token in tokens {
        let gap_end = token.span.start.min(source.len());
        if gap_start < gap_end {
            count += comments_in_gap(&source[gap_start..gap_end]);
        }
        gap_start = gap_start.max(token.span.end);
    }

    count
}

fn comments_in_gap(gap: &[u8]) -> usize {
    let mut count = 0;
    let mut i = 0;

    while i + 1 < gap.len() {
        match (gap[i], gap[i + 1]) {
            (b'/', b'/') => {
                count += 1;
                i += 2;
                while i < gap.len() && gap[i] != b'\n' {
                    i += 1;
                }
            }
            (b'/', b'*') => {
                count += 1;
                i += 2;
                while i + 1 < gap.len() && !(gap[i] == b'*' && gap[i + 1] == b'/') {
                    i += 1;
                }
                i += 2;
            }
            _ => i += 1,
        }
    }

    count
}

/// Tokenizer front end with metrics and coded logging
pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    /// Metrics of the last tokenization
    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    /// Tokenize a buffer, stopping at the first lexical error
    pub fn tokenize_source(&mut self, source: &[u8]) -> Result<TokenStream, LexerError> {
        let start_time = Instant::now();
        self.metrics = LexicalMetrics::default();

        log_debug!("Starting lexical analysis",
            "bytes" => source.len(),
            "max_tokens_allowed" => MAX_TOKEN_COUNT,
            "max_identifier_length" => MAX_IDENTIFIER_LENGTH,
            "max_string_size" => MAX_STRING_SIZE
        );

        let tokens = Lexer::new(source).tokenize().map_err(|error| {
            log_debug!("Lexical analysis stopped",
                "code" => error.error_code(),
                "line" => error.line(),
                "offset" => error.offset()
            );
            error
        })?;

        for token in &tokens {
            if self.preferences.collect_detailed_metrics {
                self.metrics.record_token(token);
            } else {
                self.metrics.total_tokens += 1;
            }
        }
        if self.preferences.collect_detailed_metrics {
            self.metrics.comment_count = count_comments(source, &tokens);
        }
        self.metrics.line_count = tokens.last().map_or(1, |t| t.line);
        self.metrics.duration = start_time.elapsed();

        if self.preferences.log_token_summary {
            log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
                "tokens" => self.metrics.total_tokens,
                "lines" => self.metrics.line_count,
                "identifiers" => self.metrics.identifiers,
                "literals" => self.metrics.literal_count(),
                "comments" => self.metrics.comment_count,
                "duration_ms" => format!("{:.3}", self.metrics.duration.as_secs_f64() * 1000.0)
            );
        }

        Ok(TokenStream::with_source_map(tokens, SourceMap::new(source)))
    }

    /// Tokenize the contents of a loaded file
    pub fn tokenize_file_result(
        &mut self,
        file_result: FileProcessingResult,
    ) -> Result<TokenStream, LexerError> {
        let file_path = file_result.metadata.path.display().to_string();

        log_debug!("Tokenizing file",
            "file" => file_path,
            "line_count" => file_result.metadata.line_count
        );

        self.tokenize_source(&file_result.source)
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_metrics_by_category() {
        let mut analyzer = LexicalAnalyzer::new();
        let stream = analyzer
            .tokenize_source(b"int main() {\n  char c = 'a';\n  return 1.5 + 2;\n}\n")
            .unwrap();

        let metrics = analyzer.metrics();
        assert_eq!(metrics.total_tokens, stream.len());
        assert_eq!(metrics.keywords, 3);
        assert_eq!(metrics.identifiers, 2);
        assert_eq!(metrics.char_literals, 1);
        assert_eq!(metrics.real_literals, 1);
        assert_eq!(metrics.int_literals, 1);
        assert_eq!(metrics.operators, 2);
        assert_eq!(metrics.punctuation, 6);
        assert_eq!(metrics.longest_identifier, 4);
        assert_eq!(metrics.line_count, 5);
        assert!(metrics.tokens_per_line() > 3.0);
    }

    #[test]
    fn test_comment_count() {
        let source = b"// head\nint /* a\n b */ x; // tail\n/**/";
        let mut analyzer = LexicalAnalyzer::new();
        analyzer.tokenize_source(source).unwrap();

        assert_eq!(analyzer.metrics().comment_count, 4);
    }

    #[test]
    fn test_comment_markers_inside_strings_are_not_counted() {
        let mut analyzer = LexicalAnalyzer::new();
        analyzer.tokenize_source(b"\"// not a comment\";").unwrap();

        assert_eq!(analyzer.metrics().comment_count, 0);
        assert_eq!(analyzer.metrics().string_literals, 1);
    }

    #[test]
    fn test_error_is_returned() {
        let mut analyzer = LexicalAnalyzer::new();
        let result = analyzer.tokenize_source(b"int x;\nint 0x;");

        assert_matches!(result, Err(LexerError::MalformedNumber { line: 2, .. }));
    }

    #[test]
    fn test_empty_source() {
        let mut analyzer = LexicalAnalyzer::new();
        let stream = analyzer.tokenize_source(b"").unwrap();

        assert_eq!(stream.len(), 1);
        assert!(stream.current().is_end());
        assert_eq!(analyzer.metrics().total_tokens, 1);
    }

    #[test]
    fn test_summary_only_preferences() {
        let preferences = LexicalPreferences {
            collect_detailed_metrics: false,
            log_token_summary: false,
        };
        let mut analyzer = LexicalAnalyzer::with_preferences(preferences);
        analyzer.tokenize_source(b"int x; // c").unwrap();

        let metrics = analyzer.metrics();
        assert_eq!(metrics.total_tokens, 4);
        assert_eq!(metrics.keywords, 0);
        assert_eq!(metrics.comment_count, 0);
        assert!(!analyzer.preferences().collect_detailed_metrics);
    }

    #[test]
    fn test_tokenize_file_result() {
        use crate::file_processor::FileProcessor;
        use std::io::Write;

        let mut file = tempfile::Builder::new().suffix(".c").tempfile().unwrap();
        file.write_all(b"double d;\n").unwrap();

        let loaded = FileProcessor::new()
            .process_file(file.path().to_str().unwrap())
            .unwrap();
        let mut analyzer = LexicalAnalyzer::new();
        let stream = analyzer.tokenize_file_result(loaded).unwrap();

        let kinds: Vec<TokenKind> = stream.tokens().iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Double, TokenKind::Id, TokenKind::Semicolon, TokenKind::End]
        );
    }
}
