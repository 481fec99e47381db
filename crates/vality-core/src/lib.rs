//! Desugaring pass for the Vality schema DSL.
//!
//! Authors write compact shorthand for validator schemas; this pass expands
//! it into the fully explicit call form the runtime executes:
//!
//! ```text
//! { a: v.number, b: [v.string] }
//! => v.object({ a: v.number({}), b: v.array(v.string({}))({}) })({})
//! ```
//!
//! The pass is a pure tree-to-tree rewrite. Shapes it does not recognise
//! are left untouched, so it never fails on a syntactically valid tree.

mod classify;
mod oracle;
mod registry;
mod rewrite;

pub use classify::{classify, namespace_access, valit_selector, Classification};
pub use oracle::{ancestor_contains_shorthand, contains_shorthand};
pub use registry::{ExpandSelectors, Registry, RegistryError};
pub use rewrite::{Desugar, Stats};

use rhizome_vality_ast::print;
use rhizome_vality_syntax_typescript::{parse, Dialect, ParseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DesugarError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to print rewritten source")]
    Print(#[from] std::fmt::Error),
}

/// Parse `source`, run the pass, and print the result.
pub fn desugar_source(
    source: &str,
    dialect: Dialect,
    registry: &Registry,
) -> Result<String, DesugarError> {
    let mut ast = parse(source, dialect)?;
    Desugar::new(registry.clone()).run(&mut ast);
    Ok(print(&ast)?)
}
