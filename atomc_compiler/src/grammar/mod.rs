//! Grammar-side data for AtomC: the syntax tree the recognizer builds

pub mod ast;

pub use ast::nodes::*;
