//! Shared source-location types used by the tokenizer, the recognizer and logging.

pub mod span;

pub use span::{Position, SourceMap, Span};
