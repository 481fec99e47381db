//! Structural validation of the arena.

use crate::{Ast, NodeId};
use thiserror::Error;

/// Errors that can occur during validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("tree has no root")]
    MissingRoot,

    #[error("root {0:?} has a parent")]
    RootHasParent(NodeId),

    #[error("node {child:?} is held by {holder:?} but its parent link is {parent:?}")]
    BrokenParentLink {
        child: NodeId,
        holder: NodeId,
        parent: Option<NodeId>,
    },

    #[error("node {0:?} is reachable more than once")]
    SharedNode(NodeId),
}

/// Validate the tree for structural correctness.
///
/// Checks, for every node reachable from the root:
/// - the parent link of each child points back to the node holding it
/// - no node sits in two slots
///
/// Unreachable nodes left behind by replacements are ignored.
pub fn validate(ast: &Ast) -> Result<(), ValidationError> {
    let root = ast.root().ok_or(ValidationError::MissingRoot)?;
    if ast.parent(root).is_some() {
        return Err(ValidationError::RootHasParent(root));
    }

    let mut seen = vec![false; ast.len()];
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if std::mem::replace(&mut seen[id.index()], true) {
            return Err(ValidationError::SharedNode(id));
        }
        for child in ast.children(id) {
            if ast.parent(child) != Some(id) {
                return Err(ValidationError::BrokenParentLink {
                    child,
                    holder: id,
                    parent: ast.parent(child),
                });
            }
            stack.push(child);
        }
    }

    Ok(())
}
