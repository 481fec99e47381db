//! Containment oracles.
//!
//! These decide whether a generic literal is schema shorthand or plain data.
//! Both are pure functions over the current tree so they can be tested
//! apart from the rewriter.

use crate::{classify, Registry};
use rhizome_vality_ast::{Ast, Expr, NodeId};

/// Does any reachable leaf of `id` reference a guard or valit?
///
/// - arrays: any non-spread element (holes and spreads never count)
/// - objects: any property value
/// - properties: the value
/// - calls: the callee only, so `v.array(x)` counts whatever `x` is
/// - member accesses: the classifier
pub fn contains_shorthand(ast: &Ast, id: NodeId, registry: &Registry) -> bool {
    match ast.expr(id) {
        Expr::Array { elements } => elements.iter().flatten().any(|&element| {
            !matches!(ast.expr(element), Expr::Spread { .. })
                && contains_shorthand(ast, element, registry)
        }),
        Expr::Object { members } => members
            .iter()
            .any(|&member| contains_shorthand(ast, member, registry)),
        Expr::Property { value, .. } => contains_shorthand(ast, *value, registry),
        Expr::Call { callee, .. } => contains_shorthand(ast, *callee, registry),
        Expr::Member { .. } => classify(ast, id, registry).is_reference(),
        _ => false,
    }
}

/// Is `id` nested in schema context?
///
/// Walks up through array elements, property values, and member objects,
/// and reports whether any ancestor on that chain contains shorthand.
/// Property keys and every other node kind end the chain.
pub fn ancestor_contains_shorthand(ast: &Ast, id: NodeId, registry: &Registry) -> bool {
    let mut current = id;
    while let Some(parent) = ast.parent(current) {
        let on_chain = match ast.expr(parent) {
            Expr::Array { .. } | Expr::Object { .. } => true,
            Expr::Property { value, .. } => *value == current,
            Expr::Member { object, .. } => *object == current,
            _ => false,
        };
        if !on_chain {
            return false;
        }
        if contains_shorthand(ast, parent, registry) {
            return true;
        }
        current = parent;
    }
    false
}
