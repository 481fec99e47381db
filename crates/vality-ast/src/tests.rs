//! Tests for the expression arena.

use crate::*;

#[test]
fn test_literal_constructors() {
    assert_eq!(Literal::string("x").raw(), "\"x\"");
    assert_eq!(Literal::string("say \"hi\"").raw(), r#""say \"hi\"""#);
    assert_eq!(Literal::number(1.0).raw(), "1");
    assert_eq!(Literal::number(2.5).raw(), "2.5");
    assert_eq!(Literal::number(f64::INFINITY).raw(), "Infinity");
    assert_eq!(Literal::Bool(false).raw(), "false");
    assert_eq!(Literal::Null.raw(), "null");
}

#[test]
fn test_alloc_links_parents() {
    let mut ast = Ast::new("");
    let callee = ast.identifier("f");
    let a = ast.number(1.0);
    let b = ast.string("b");
    let call = ast.call(callee, vec![a, b]);

    assert_eq!(ast.parent(callee), Some(call));
    assert_eq!(ast.parent(a), Some(call));
    assert_eq!(ast.parent(b), Some(call));
    assert_eq!(ast.children(call), vec![callee, a, b]);
    assert_eq!(ast.kind(call), NodeKind::Call);
}

#[test]
fn test_replace_with_wraps_target() {
    let mut ast = Ast::new("");
    let reference = ast.reference("v", "number");
    let items = ast.array(vec![reference]);
    ast.set_root(items);

    let wrapped = ast.replace_with(reference, |ast, target| ast.guard_call(target));

    assert_eq!(ast.parent(wrapped), Some(items));
    assert_eq!(ast.parent(reference), Some(wrapped));
    assert_eq!(ast.children(items), vec![wrapped]);
    assert_eq!(validate(&ast), Ok(()));
    assert_eq!(print(&ast).unwrap(), "[v.number({})]");
}

#[test]
fn test_replace_with_root() {
    let mut ast = Ast::new("");
    let reference = ast.reference("v", "array");
    ast.set_root(reference);

    let replacement = ast.replace_with(reference, |ast, target| ast.valit_call(target, vec![]));

    assert_eq!(ast.root(), Some(replacement));
    assert_eq!(validate(&ast), Ok(()));
    assert_eq!(print(&ast).unwrap(), "v.array()({})");
}

#[test]
fn test_replace_with_detaches_old_node() {
    let mut ast = Ast::new("");
    let element = ast.reference("v", "number");
    let items = ast.array(vec![element]);
    let callee = ast.identifier("f");
    let call = ast.call(callee, vec![items]);
    ast.set_root(call);

    // Replace the array by a call that reuses its element, not the array.
    let replacement = ast.replace_with(items, |ast, _| {
        let reference = ast.reference("v", "array");
        ast.valit_call(reference, vec![element])
    });

    assert_eq!(ast.children(call), vec![callee, replacement]);
    assert_eq!(validate(&ast), Ok(()));
    assert_eq!(print(&ast).unwrap(), "f(v.array(v.number)({}))");
}

#[test]
fn test_mark_processed_covers_subtree() {
    let mut ast = Ast::new("");
    let reference = ast.reference("v", "number");
    let call = ast.guard_call(reference);
    let other = ast.identifier("other");
    let items = ast.array(vec![call, other]);
    ast.set_root(items);

    ast.mark_processed(call);

    assert!(ast.is_processed(call));
    assert!(ast.is_processed(reference));
    assert!(!ast.is_processed(other));
    assert!(!ast.is_processed(items));

    ast.clear_processed();
    assert!(!ast.is_processed(reference));
}

#[test]
fn test_descendants_document_order() {
    let mut ast = Ast::new("");
    let a = ast.identifier("a");
    let b = ast.identifier("b");
    let inner = ast.array(vec![a]);
    let outer = ast.array(vec![inner, b]);
    ast.set_root(outer);

    assert_eq!(ast.descendants(), vec![outer, inner, a, b]);
}

#[test]
fn test_print_synthesized_forms() {
    let mut ast = Ast::new("");
    let number = ast.reference("v", "number");
    let number = ast.guard_call(number);
    let key_value = ast.property("a", number);
    let literal = ast.string("x");
    let literal_ref = ast.reference("v", "literal");
    let literal = ast.valit_call(literal_ref, vec![literal]);
    let b = ast.property("b", literal);
    let fields = ast.object(vec![key_value, b]);
    let object_ref = ast.reference("v", "object");
    let shape = ast.valit_call(object_ref, vec![fields]);
    ast.set_root(shape);

    assert_eq!(
        print(&ast).unwrap(),
        "v.object({ a: v.number({}), b: v.literal(\"x\")({}) })({})"
    );
    assert_eq!(print_node(&ast, number).unwrap(), "v.number({})");
}

#[test]
fn test_print_parenthesizes_operands() {
    let mut ast = Ast::new("");
    let fields = ast.object(vec![]);
    let member = ast.member(fields, "x");
    let n = ast.number(1.0);
    let call = ast.call(n, vec![member]);
    ast.set_root(call);

    assert_eq!(print(&ast).unwrap(), "(1)(({}).x)");
}

#[test]
fn test_print_holes() {
    let mut ast = Ast::new("");
    let a = ast.identifier("a");
    let items = ast.alloc(
        Expr::Array {
            elements: vec![Some(a), None],
        },
        None,
    );
    ast.set_root(items);

    assert_eq!(print(&ast).unwrap(), "[a, ,]");
}

#[test]
fn test_print_other_pieces() {
    let mut ast = Ast::new("");
    let reference = ast.reference("v", "number");
    let statement = ast.alloc(
        Expr::Other {
            kind: "expression_statement".into(),
            pieces: vec![Piece::Node(reference), Piece::Text(";".into())],
        },
        None,
    );
    ast.set_root(statement);

    assert_eq!(print(&ast).unwrap(), "v.number;");
}

#[test]
fn test_print_new_with_synthesized_constructor() {
    let mut ast = Ast::new("");
    let reference = ast.reference("v", "array");
    let constructor = ast.valit_call(reference, vec![]);
    let y = ast.identifier("y");
    let expression = ast.alloc(
        Expr::Other {
            kind: "new_expression".into(),
            pieces: vec![
                Piece::Text("new ".into()),
                Piece::Node(constructor),
                Piece::Text("(".into()),
                Piece::Node(y),
                Piece::Text(")".into()),
            ],
        },
        None,
    );
    ast.set_root(expression);

    assert_eq!(print(&ast).unwrap(), "new (v.array()({}))(y)");
}
