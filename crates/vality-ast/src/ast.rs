//! Arena types.

use std::ops::Range;

/// Index of a node inside an [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Primitive literal value.
///
/// Every literal keeps the exact text it was written with, so printing a
/// moved literal never changes quoting or numeric notation.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str { value: String, raw: String },
    Number { value: f64, raw: String },
    Bool(bool),
    Null,
}

impl Literal {
    /// Creates a string literal quoted with double quotes.
    pub fn string(value: impl Into<String>) -> Self {
        let value = value.into();
        let raw = serde_json::to_string(&value).unwrap_or_else(|_| format!("\"{}\"", value));
        Literal::Str { value, raw }
    }

    /// Creates a number literal.
    pub fn number(value: f64) -> Self {
        let raw = if value.is_nan() {
            "NaN".to_string()
        } else if value.is_infinite() {
            if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
        } else {
            value.to_string()
        };
        Literal::Number { value, raw }
    }

    /// Source text of the literal.
    pub fn raw(&self) -> &str {
        match self {
            Literal::Str { raw, .. } | Literal::Number { raw, .. } => raw,
            Literal::Bool(true) => "true",
            Literal::Bool(false) => "false",
            Literal::Null => "null",
        }
    }
}

/// Property side of a member access.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProperty {
    /// `object.name`
    Name(String),
    /// `object[expr]`
    Computed(NodeId),
}

/// Key of an object literal property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropKey {
    Ident(String),
    /// Raw string key, quotes included.
    Str(String),
    /// Raw numeric key.
    Number(String),
    Computed(NodeId),
}

/// Fragment of an uninterpreted node.
#[derive(Debug, Clone, PartialEq)]
pub enum Piece {
    Text(String),
    Node(NodeId),
}

/// Node payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(String),
    Member {
        object: NodeId,
        property: MemberProperty,
    },
    Call {
        callee: NodeId,
        /// Raw `<...>` text of explicit type arguments.
        type_arguments: Option<String>,
        arguments: Vec<NodeId>,
    },
    Array {
        /// `None` marks a hole in a sparse array.
        elements: Vec<Option<NodeId>>,
    },
    Object {
        members: Vec<NodeId>,
    },
    Property {
        key: PropKey,
        value: NodeId,
        /// Written as `{ name }`.
        shorthand: bool,
    },
    Spread {
        argument: NodeId,
    },
    Literal(Literal),
    /// Any syntax the pass does not interpret, kept as text around its children.
    Other {
        kind: String,
        pieces: Vec<Piece>,
    },
}

/// Fieldless discriminant of [`Expr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Identifier,
    Member,
    Call,
    Array,
    Object,
    Property,
    Spread,
    Literal,
    Other,
}

impl Expr {
    pub fn kind(&self) -> NodeKind {
        match self {
            Expr::Identifier(_) => NodeKind::Identifier,
            Expr::Member { .. } => NodeKind::Member,
            Expr::Call { .. } => NodeKind::Call,
            Expr::Array { .. } => NodeKind::Array,
            Expr::Object { .. } => NodeKind::Object,
            Expr::Property { .. } => NodeKind::Property,
            Expr::Spread { .. } => NodeKind::Spread,
            Expr::Literal(_) => NodeKind::Literal,
            Expr::Other { .. } => NodeKind::Other,
        }
    }

    /// Child nodes in document order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            Expr::Identifier(_) | Expr::Literal(_) => Vec::new(),
            Expr::Member { object, property } => match property {
                MemberProperty::Name(_) => vec![*object],
                MemberProperty::Computed(index) => vec![*object, *index],
            },
            Expr::Call {
                callee, arguments, ..
            } => std::iter::once(*callee)
                .chain(arguments.iter().copied())
                .collect(),
            Expr::Array { elements } => elements.iter().flatten().copied().collect(),
            Expr::Object { members } => members.clone(),
            Expr::Property { key, value, .. } => match key {
                PropKey::Computed(key) => vec![*key, *value],
                _ => vec![*value],
            },
            Expr::Spread { argument } => vec![*argument],
            Expr::Other { pieces, .. } => pieces
                .iter()
                .filter_map(|piece| match piece {
                    Piece::Node(id) => Some(*id),
                    Piece::Text(_) => None,
                })
                .collect(),
        }
    }

    /// Visits every slot holding a child id.
    fn for_each_slot_mut(&mut self, mut f: impl FnMut(&mut NodeId)) {
        match self {
            Expr::Identifier(_) | Expr::Literal(_) => {}
            Expr::Member { object, property } => {
                f(object);
                if let MemberProperty::Computed(index) = property {
                    f(index);
                }
            }
            Expr::Call {
                callee, arguments, ..
            } => {
                f(callee);
                arguments.iter_mut().for_each(f);
            }
            Expr::Array { elements } => elements.iter_mut().flatten().for_each(f),
            Expr::Object { members } => members.iter_mut().for_each(f),
            Expr::Property { key, value, .. } => {
                if let PropKey::Computed(key) = key {
                    f(key);
                }
                f(value);
            }
            Expr::Spread { argument } => f(argument),
            Expr::Other { pieces, .. } => {
                for piece in pieces {
                    if let Piece::Node(id) = piece {
                        f(id);
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) expr: Expr,
    pub(crate) parent: Option<NodeId>,
    pub(crate) span: Option<Range<usize>>,
    /// Subtree unchanged since parsing.
    pub(crate) pristine: bool,
    pub(crate) processed: bool,
}

/// Expression tree of one compilation unit.
#[derive(Debug, Clone)]
pub struct Ast {
    source: String,
    pub(crate) nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Ast {
    /// Creates an empty arena over `source`, the text parsed spans refer to.
    pub fn new(source: impl Into<String>) -> Self {
        Ast {
            source: source.into(),
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Allocates a node and adopts its children.
    ///
    /// Nodes allocated with a span are pristine and print verbatim until
    /// something below them is replaced.
    pub fn alloc(&mut self, expr: Expr, span: Option<Range<usize>>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for child in expr.children() {
            self.nodes[child.index()].parent = Some(id);
        }
        let pristine = span.is_some();
        self.nodes.push(Node {
            expr,
            parent: None,
            span,
            pristine,
            processed: false,
        });
        id
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.nodes[id.index()].parent = None;
        self.root = Some(id);
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of allocated nodes, reachable or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn expr(&self, id: NodeId) -> &Expr {
        &self.nodes[id.index()].expr
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.expr(id).kind()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.expr(id).children()
    }

    pub fn span(&self, id: NodeId) -> Option<Range<usize>> {
        self.nodes[id.index()].span.clone()
    }

    /// Original source text of a parsed node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.index()]
            .span
            .as_ref()
            .and_then(|span| self.source.get(span.clone()))
    }

    pub fn is_pristine(&self, id: NodeId) -> bool {
        self.nodes[id.index()].pristine
    }

    /// Replaces the node at `target`'s position with the node returned by `build`.
    ///
    /// `build` receives `target` detached from its parent and may embed it in
    /// the replacement. Returns the replacement id.
    pub fn replace_with<F>(&mut self, target: NodeId, build: F) -> NodeId
    where
        F: FnOnce(&mut Ast, NodeId) -> NodeId,
    {
        let parent = self.nodes[target.index()].parent.take();
        let was_root = self.root == Some(target);

        let replacement = build(self, target);

        if replacement != target {
            match parent {
                Some(parent) => {
                    self.nodes[parent.index()].expr.for_each_slot_mut(|slot| {
                        if *slot == target {
                            *slot = replacement;
                        }
                    });
                    self.nodes[replacement.index()].parent = Some(parent);
                }
                None if was_root => self.root = Some(replacement),
                None => {}
            }
        } else {
            self.nodes[target.index()].parent = parent;
        }

        self.touch(replacement);
        replacement
    }

    /// Clears the pristine flag on `id` and all its ancestors.
    fn touch(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(id) = current {
            let node = &mut self.nodes[id.index()];
            node.pristine = false;
            current = node.parent;
        }
    }

    /// Marks the whole subtree rooted at `id` as fully processed.
    pub fn mark_processed(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let node = &mut self.nodes[id.index()];
            node.processed = true;
            stack.extend(node.expr.children());
        }
    }

    pub fn is_processed(&self, id: NodeId) -> bool {
        self.nodes[id.index()].processed
    }

    pub fn clear_processed(&mut self) {
        for node in &mut self.nodes {
            node.processed = false;
        }
    }

    /// Reachable nodes in document order, starting at the root.
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            let mut children = self.children(id);
            children.reverse();
            stack.extend(children);
        }
        order
    }
}
