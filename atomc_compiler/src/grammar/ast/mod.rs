//! Syntax tree for AtomC compilation units

pub mod nodes;

pub use nodes::*;
