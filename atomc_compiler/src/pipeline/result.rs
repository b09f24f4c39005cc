use crate::file_processor::FileMetadata;
use crate::grammar::ast::Unit;
use crate::lexical::{LexerError, LexicalMetrics};
use crate::tokens::Token;
use std::time::Duration;

/// Accepted unit with the data gathered along the way
#[derive(Debug)]
pub struct PipelineResult {
    pub unit: Unit,
    pub file_metadata: FileMetadata,
    pub lexical_metrics: LexicalMetrics,
    pub token_count: usize,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn new(
        unit: Unit,
        file_metadata: FileMetadata,
        lexical_metrics: LexicalMetrics,
        token_count: usize,
        processing_duration: Duration,
    ) -> Self {
        Self {
            unit,
            file_metadata,
            lexical_metrics,
            token_count,
            processing_duration,
        }
    }

    pub fn log_success(&self, file_path: &str) {
        let seconds = self.processing_duration.as_secs_f64().max(f64::EPSILON);

        crate::log_success!(
            crate::logging::codes::success::PIPELINE_COMPLETE,
            "AtomC unit accepted",
            "file" => file_path,
            "items" => self.unit.items.len(),
            "duration_ms" => format!("{:.2}", self.processing_duration.as_secs_f64() * 1000.0),
            "processing_rate_bytes_per_sec" => format!("{:.0}",
                self.file_metadata.size as f64 / seconds),
            "processing_rate_tokens_per_sec" => format!("{:.0}",
                self.token_count as f64 / seconds)
        );
    }
}

/// Tokens of a file for the dump mode, cut short by the first lexical error
#[derive(Debug)]
pub struct TokenDump {
    pub tokens: Vec<Token>,
    pub error: Option<LexerError>,
    pub file_metadata: FileMetadata,
}

impl TokenDump {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}
