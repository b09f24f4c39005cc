// Internal modules
pub mod config;
pub mod file_processor;
pub mod grammar;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use grammar::ast::Unit;
pub use pipeline::{PipelineError, PipelineResult, TokenDump};
pub use syntax::{Parser, SyntaxError};
pub use tokens::{Token, TokenKind, TokenStream, TokenValue};
