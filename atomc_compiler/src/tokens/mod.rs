//! Token model for the AtomC front end
//!
//! The tokenizer turns source bytes into a list of [`Token`]s, each tagged
//! with a [`TokenKind`], the line it ends on and the byte range it covers.
//! The recognizer then walks that list through a [`TokenStream`], which
//! supports marking and resetting for backtracking.
//!
//! ## Token categories
//!
//! - **Literals**: `CtInt`, `CtReal`, `CtChar`, `CtString`, carrying their value
//! - **Identifiers**: `Id`, carrying the name
//! - **Keywords**: `break char double else for if int return struct void while`
//! - **Operators and punctuation**: `+ - * / . && || ! != == = < <= > >= , ; ( ) [ ] { }`
//! - **Markers**: `End` closes every stream; `Error` marks invalid input

pub mod kind;
pub mod token;
pub mod token_stream;

pub use kind::{keyword_kind, TokenKind, KEYWORDS};
pub use token::{Token, TokenValue};
pub use token_stream::TokenStream;

pub use crate::utils::{Position, SourceMap, Span};
