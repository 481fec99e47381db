//! Source emission.
//!
//! Pristine nodes are copied from the original source; rewritten and
//! synthesized nodes are printed in canonical formatting.

use crate::{Ast, Expr, MemberProperty, NodeId, Piece, PropKey};
use std::fmt::Write as FmtWrite;

/// `Other` kinds that can be a callee or member object without parentheses.
const PRIMARY_OTHER_KINDS: &[&str] = &[
    "this",
    "super",
    "parenthesized_expression",
    "template_string",
    "non_null_expression",
    "regex",
];

/// Print the whole tree.
pub fn print(ast: &Ast) -> Result<String, std::fmt::Error> {
    let mut output = String::new();
    if let Some(root) = ast.root() {
        emit(ast, &mut output, root)?;
    }
    Ok(output)
}

/// Print a single subtree.
pub fn print_node(ast: &Ast, id: NodeId) -> Result<String, std::fmt::Error> {
    let mut output = String::new();
    emit(ast, &mut output, id)?;
    Ok(output)
}

fn emit(ast: &Ast, output: &mut String, id: NodeId) -> std::fmt::Result {
    if ast.is_pristine(id) {
        if let Some(text) = ast.text(id) {
            output.push_str(text);
            return Ok(());
        }
    }

    match ast.expr(id) {
        Expr::Identifier(name) => output.push_str(name),
        Expr::Literal(literal) => output.push_str(literal.raw()),
        Expr::Member { object, property } => {
            emit_operand(ast, output, *object)?;
            match property {
                MemberProperty::Name(name) => write!(output, ".{}", name)?,
                MemberProperty::Computed(index) => {
                    output.push('[');
                    emit(ast, output, *index)?;
                    output.push(']');
                }
            }
        }
        Expr::Call {
            callee,
            type_arguments,
            arguments,
        } => {
            emit_operand(ast, output, *callee)?;
            if let Some(type_arguments) = type_arguments {
                output.push_str(type_arguments);
            }
            output.push('(');
            emit_list(ast, output, arguments)?;
            output.push(')');
        }
        Expr::Array { elements } => {
            output.push('[');
            for (idx, element) in elements.iter().enumerate() {
                if idx > 0 {
                    output.push_str(", ");
                }
                if let Some(element) = element {
                    emit(ast, output, *element)?;
                }
            }
            // A trailing hole needs its own comma.
            if matches!(elements.last(), Some(None)) {
                output.push(',');
            }
            output.push(']');
        }
        Expr::Object { members } => {
            if members.is_empty() {
                output.push_str("{}");
            } else {
                output.push_str("{ ");
                emit_list(ast, output, members)?;
                output.push_str(" }");
            }
        }
        Expr::Property {
            key,
            value,
            shorthand,
        } => {
            let same_name = match (key, ast.expr(*value)) {
                (PropKey::Ident(key), Expr::Identifier(name)) => key == name,
                _ => false,
            };
            if *shorthand && same_name {
                return emit(ast, output, *value);
            }
            match key {
                PropKey::Ident(raw) | PropKey::Str(raw) | PropKey::Number(raw) => {
                    output.push_str(raw)
                }
                PropKey::Computed(key) => {
                    output.push('[');
                    emit(ast, output, *key)?;
                    output.push(']');
                }
            }
            output.push_str(": ");
            emit(ast, output, *value)?;
        }
        Expr::Spread { argument } => {
            output.push_str("...");
            emit(ast, output, *argument)?;
        }
        Expr::Other { kind, pieces } => {
            for piece in pieces {
                match piece {
                    Piece::Text(text) => output.push_str(text),
                    Piece::Node(child) if needs_parens(ast, kind, *child) => {
                        output.push('(');
                        emit(ast, output, *child)?;
                        output.push(')');
                    }
                    Piece::Node(child) => emit(ast, output, *child)?,
                }
            }
        }
    }

    Ok(())
}

fn emit_list(ast: &Ast, output: &mut String, items: &[NodeId]) -> std::fmt::Result {
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            output.push_str(", ");
        }
        emit(ast, output, *item)?;
    }
    Ok(())
}

/// Rewritten calls in a `new` expression keep their own argument list.
fn needs_parens(ast: &Ast, parent_kind: &str, child: NodeId) -> bool {
    parent_kind == "new_expression"
        && !ast.is_pristine(child)
        && matches!(ast.expr(child), Expr::Call { .. })
}

/// Emit a callee or member object, parenthesized unless it is a primary expression.
fn emit_operand(ast: &Ast, output: &mut String, id: NodeId) -> std::fmt::Result {
    let primary = match ast.expr(id) {
        Expr::Identifier(_)
        | Expr::Member { .. }
        | Expr::Call { .. }
        | Expr::Array { .. } => true,
        Expr::Literal(literal) => !matches!(literal, crate::Literal::Number { .. }),
        Expr::Other { kind, .. } => PRIMARY_OTHER_KINDS.contains(&kind.as_str()),
        _ => false,
    };

    if primary {
        emit(ast, output, id)
    } else {
        output.push('(');
        emit(ast, output, id)?;
        output.push(')');
        Ok(())
    }
}
