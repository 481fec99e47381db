//! Tree-sitter based TypeScript frontend.

use std::ops::Range;
use std::path::Path;

use rhizome_vality_ast::{Ast, Expr, Literal, MemberProperty, NodeId, Piece, PropKey};
use thiserror::Error;
use tracing::debug;
use tree_sitter::{Node, Parser};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("syntax error at {line}:{column}: {snippet}")]
    Syntax {
        line: usize,
        column: usize,
        snippet: String,
    },
}

/// Grammar used to parse a compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// TypeScript, also used for plain JavaScript.
    #[default]
    TypeScript,
    /// TypeScript with JSX.
    Tsx,
}

impl Dialect {
    /// Picks the grammar from a file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("tsx") | Some("jsx") => Dialect::Tsx,
            _ => Dialect::TypeScript,
        }
    }
}

/// Node kinds a parenthesized expression is transparent around.
const TRANSPARENT_KINDS: &[&str] = &[
    "identifier",
    "member_expression",
    "subscript_expression",
    "call_expression",
    "array",
    "object",
    "string",
    "number",
    "true",
    "false",
    "null",
    "parenthesized_expression",
];

/// Type-level subtrees, kept as a single verbatim piece.
///
/// `typeof v.number` in a type is a qualified name, not a member access.
const TYPE_KINDS: &[&str] = &[
    "type_annotation",
    "opting_type_annotation",
    "omitting_type_annotation",
    "adding_type_annotation",
    "asserts_annotation",
    "type_predicate_annotation",
    "type_arguments",
    "type_parameters",
    "type_query",
    "type_alias_declaration",
    "interface_declaration",
    "implements_clause",
    "extends_type_clause",
];

/// Parse source text into an expression arena.
pub fn parse(source: &str, dialect: Dialect) -> Result<Ast, ParseError> {
    let mut parser = Parser::new();
    let language = match dialect {
        Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT,
        Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX,
    };
    parser
        .set_language(&language.into())
        .map_err(|err| ParseError::Parse(err.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::Parse("failed to parse".into()))?;

    let root = tree.root_node();
    if root.has_error() {
        let error = first_error(root).unwrap_or(root);
        let position = error.start_position();
        let snippet = error
            .utf8_text(source.as_bytes())
            .unwrap_or("")
            .lines()
            .next()
            .unwrap_or("")
            .to_string();
        return Err(ParseError::Syntax {
            line: position.row + 1,
            column: position.column + 1,
            snippet,
        });
    }

    let mut ctx = LowerContext::new(source);
    let program = ctx.lower_other(root, 0..source.len());
    ctx.ast.set_root(program);
    debug!(nodes = ctx.ast.len(), ?dialect, "lowered source");
    Ok(ctx.ast)
}

fn first_error<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'tree>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(first_error)
}

struct LowerContext<'a> {
    source: &'a str,
    ast: Ast,
}

impl<'a> LowerContext<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            ast: Ast::new(source),
        }
    }

    fn node_text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn slice(&self, range: Range<usize>) -> &'a str {
        self.source.get(range).unwrap_or("")
    }

    fn lower(&mut self, node: Node) -> NodeId {
        match node.kind() {
            // Literals
            "string" => {
                let raw = self.node_text(node);
                let literal = Literal::Str {
                    value: unquote(raw),
                    raw: raw.to_string(),
                };
                self.leaf(node, Expr::Literal(literal))
            }
            "number" => {
                let raw = self.node_text(node);
                let literal = Literal::Number {
                    value: number_value(raw),
                    raw: raw.to_string(),
                };
                self.leaf(node, Expr::Literal(literal))
            }
            "true" => self.leaf(node, Expr::Literal(Literal::Bool(true))),
            "false" => self.leaf(node, Expr::Literal(Literal::Bool(false))),
            "null" => self.leaf(node, Expr::Literal(Literal::Null)),

            // Expressions
            "identifier" | "undefined" => {
                let name = self.node_text(node).to_string();
                self.leaf(node, Expr::Identifier(name))
            }
            "member_expression" => self.lower_member_expr(node),
            "subscript_expression" => self.lower_subscript_expr(node),
            "call_expression" => self.lower_call_expr(node),
            "array" => self.lower_array(node),
            "object" => self.lower_object(node),
            "spread_element" => self.lower_spread(node),
            "parenthesized_expression" => self.lower_parenthesized(node),

            kind if TYPE_KINDS.contains(&kind) => self.opaque(node),

            // Everything else is kept verbatim around its children
            _ => self.lower_other(node, node.byte_range()),
        }
    }

    fn leaf(&mut self, node: Node, expr: Expr) -> NodeId {
        self.ast.alloc(expr, Some(node.byte_range()))
    }

    /// `Other` without lowered children.
    fn opaque(&mut self, node: Node) -> NodeId {
        let text = self.node_text(node).to_string();
        self.leaf(
            node,
            Expr::Other {
                kind: node.kind().to_string(),
                pieces: vec![Piece::Text(text)],
            },
        )
    }

    fn lower_member_expr(&mut self, node: Node) -> NodeId {
        let object = node.child_by_field_name("object");
        let property = node.child_by_field_name("property");
        let (Some(object), Some(property)) = (object, property) else {
            return self.lower_other(node, node.byte_range());
        };
        if has_optional_chain(node) {
            return self.lower_other(node, node.byte_range());
        }

        let object = self.lower(object);
        let name = self.node_text(property).to_string();
        self.leaf(
            node,
            Expr::Member {
                object,
                property: MemberProperty::Name(name),
            },
        )
    }

    fn lower_subscript_expr(&mut self, node: Node) -> NodeId {
        let object = node.child_by_field_name("object");
        let index = node.child_by_field_name("index");
        let (Some(object), Some(index)) = (object, index) else {
            return self.lower_other(node, node.byte_range());
        };
        if has_optional_chain(node) {
            return self.lower_other(node, node.byte_range());
        }

        let object = self.lower(object);
        let index = self.lower(index);
        self.leaf(
            node,
            Expr::Member {
                object,
                property: MemberProperty::Computed(index),
            },
        )
    }

    fn lower_call_expr(&mut self, node: Node) -> NodeId {
        let function = node.child_by_field_name("function");
        let arguments = node.child_by_field_name("arguments");
        let (Some(function), Some(arguments)) = (function, arguments) else {
            return self.lower_other(node, node.byte_range());
        };
        // Tagged templates and optional calls are not plain calls.
        if arguments.kind() != "arguments" || has_optional_chain(node) {
            return self.lower_other(node, node.byte_range());
        }

        let type_arguments = node
            .child_by_field_name("type_arguments")
            .map(|args| self.node_text(args).to_string());

        let callee = self.lower(function);
        let arguments = named_children(arguments)
            .into_iter()
            .map(|arg| self.lower(arg))
            .collect();

        self.leaf(
            node,
            Expr::Call {
                callee,
                type_arguments,
                arguments,
            },
        )
    }

    fn lower_array(&mut self, node: Node) -> NodeId {
        let mut elements = Vec::new();
        // A comma seen while still expecting an element marks a hole.
        let mut expecting = true;

        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        for child in children {
            match child.kind() {
                "[" | "]" | "comment" => {}
                "," => {
                    if expecting {
                        elements.push(None);
                    }
                    expecting = true;
                }
                _ if child.is_named() => {
                    elements.push(Some(self.lower(child)));
                    expecting = false;
                }
                _ => {}
            }
        }

        self.leaf(node, Expr::Array { elements })
    }

    fn lower_object(&mut self, node: Node) -> NodeId {
        let mut members = Vec::new();

        for child in named_children(node) {
            let member = match child.kind() {
                "pair" => self.lower_pair(child),
                "shorthand_property_identifier" => {
                    let name = self.node_text(child).to_string();
                    let value = self.leaf(child, Expr::Identifier(name.clone()));
                    self.leaf(
                        child,
                        Expr::Property {
                            key: PropKey::Ident(name),
                            value,
                            shorthand: true,
                        },
                    )
                }
                // spread_element, method_definition, ...
                _ => self.lower(child),
            };
            members.push(member);
        }

        self.leaf(node, Expr::Object { members })
    }

    fn lower_pair(&mut self, node: Node) -> NodeId {
        let key = node.child_by_field_name("key");
        let value = node.child_by_field_name("value");
        let (Some(key), Some(value)) = (key, value) else {
            return self.lower_other(node, node.byte_range());
        };

        let key = match key.kind() {
            "string" => PropKey::Str(self.node_text(key).to_string()),
            "number" => PropKey::Number(self.node_text(key).to_string()),
            "computed_property_name" => match named_children(key).first() {
                Some(inner) => PropKey::Computed(self.lower(*inner)),
                None => PropKey::Ident(self.node_text(key).to_string()),
            },
            // property_identifier, private_property_identifier, ...
            _ => PropKey::Ident(self.node_text(key).to_string()),
        };
        let value = self.lower(value);

        self.leaf(
            node,
            Expr::Property {
                key,
                value,
                shorthand: false,
            },
        )
    }

    fn lower_spread(&mut self, node: Node) -> NodeId {
        match named_children(node).first() {
            Some(argument) => {
                let argument = self.lower(*argument);
                self.leaf(node, Expr::Spread { argument })
            }
            None => self.lower_other(node, node.byte_range()),
        }
    }

    fn lower_parenthesized(&mut self, node: Node) -> NodeId {
        let mut cursor = node.walk();
        let inner: Vec<Node> = node.named_children(&mut cursor).collect();
        match inner.as_slice() {
            [inner] if TRANSPARENT_KINDS.contains(&inner.kind()) => self.lower(*inner),
            _ => self.lower_other(node, node.byte_range()),
        }
    }

    /// Keeps `range` as verbatim text around its lowered named children.
    fn lower_other(&mut self, node: Node, range: Range<usize>) -> NodeId {
        let mut pieces = Vec::new();
        let mut offset = range.start;

        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        for child in children {
            let id = self.lower(child);
            // Transparent parentheses leave a narrower span than the child.
            let span = self.ast.span(id).unwrap_or_else(|| child.byte_range());
            if span.start > offset {
                pieces.push(Piece::Text(self.slice(offset..span.start).to_string()));
            }
            pieces.push(Piece::Node(id));
            offset = span.end;
        }
        if offset < range.end {
            pieces.push(Piece::Text(self.slice(offset..range.end).to_string()));
        }

        self.ast.alloc(
            Expr::Other {
                kind: node.kind().to_string(),
                pieces,
            },
            Some(range),
        )
    }
}

/// Named children, comments excluded.
fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    let children = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect();
    children
}

fn has_optional_chain(node: Node) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| child.kind() == "optional_chain");
    found
}

/// Decode a quoted string literal.
fn unquote(raw: &str) -> String {
    let inner = if raw.len() >= 2 {
        &raw[1..raw.len() - 1]
    } else {
        raw
    };

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            value.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some('0') => value.push('\0'),
            Some('b') => value.push('\u{8}'),
            Some('f') => value.push('\u{c}'),
            Some('v') => value.push('\u{b}'),
            // Line continuation
            Some('\n') => {}
            Some(other) => value.push(other),
            None => value.push('\\'),
        }
    }
    value
}

fn number_value(raw: &str) -> f64 {
    let cleaned = raw.replace('_', "");
    let digits = cleaned.strip_suffix('n').unwrap_or(&cleaned);
    let radix = match digits.get(..2) {
        Some("0x") | Some("0X") => 16,
        Some("0o") | Some("0O") => 8,
        Some("0b") | Some("0B") => 2,
        _ => 10,
    };
    if radix == 10 {
        digits.parse().unwrap_or(f64::NAN)
    } else {
        u64::from_str_radix(&digits[2..], radix)
            .map(|value| value as f64)
            .unwrap_or(f64::NAN)
    }
}
