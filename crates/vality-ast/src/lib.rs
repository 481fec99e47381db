//! Expression tree for the Vality desugaring pass.
//!
//! This crate defines the arena that sits between the syntax frontend
//! (tree-sitter TypeScript) and the rewriter. Nodes are addressed by
//! [`NodeId`], so a node can be read, replaced in its parent slot, or
//! wrapped by freshly built canonical calls without cloning subtrees.
//!
//! Syntax the pass does not interpret is kept as [`Expr::Other`] with its
//! verbatim text, so printing an untouched tree reproduces the source.
//!
//! Example:
//! ```
//! use rhizome_vality_ast::{print, Ast};
//!
//! let mut ast = Ast::new("");
//! let reference = ast.reference("v", "number");
//! let call = ast.guard_call(reference);
//! ast.set_root(call);
//! assert_eq!(print(&ast).unwrap(), "v.number({})");
//! ```

mod ast;
mod validation;
pub mod builders;
pub mod printer;

pub use ast::{Ast, Expr, Literal, MemberProperty, NodeId, NodeKind, Piece, PropKey};
pub use printer::{print, print_node};
pub use validation::{validate, ValidationError};

#[cfg(test)]
mod tests;
