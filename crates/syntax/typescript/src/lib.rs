//! TypeScript frontend for Vality.
//!
//! Uses tree-sitter for parsing TypeScript, then lowers the CST into
//! the Vality expression arena. Syntax outside the schema DSL is kept
//! verbatim so printing an untouched tree reproduces the source.

mod parser;

pub use parser::{parse, Dialect, ParseError};
