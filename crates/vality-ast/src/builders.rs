//! Builders for the node kinds the rewriter emits.
//!
//! Built nodes carry no span, so they always print in canonical form.

use crate::{Ast, Expr, Literal, MemberProperty, NodeId, PropKey};

// ============================================================================
// plain nodes
// ============================================================================

impl Ast {
    pub fn identifier(&mut self, name: impl Into<String>) -> NodeId {
        self.alloc(Expr::Identifier(name.into()), None)
    }

    /// `object.name`
    pub fn member(&mut self, object: NodeId, name: impl Into<String>) -> NodeId {
        self.alloc(
            Expr::Member {
                object,
                property: MemberProperty::Name(name.into()),
            },
            None,
        )
    }

    /// `callee(arguments...)`
    pub fn call(&mut self, callee: NodeId, arguments: Vec<NodeId>) -> NodeId {
        self.alloc(
            Expr::Call {
                callee,
                type_arguments: None,
                arguments,
            },
            None,
        )
    }

    pub fn array(&mut self, elements: Vec<NodeId>) -> NodeId {
        self.alloc(
            Expr::Array {
                elements: elements.into_iter().map(Some).collect(),
            },
            None,
        )
    }

    pub fn object(&mut self, members: Vec<NodeId>) -> NodeId {
        self.alloc(Expr::Object { members }, None)
    }

    /// `key: value`
    pub fn property(&mut self, key: impl Into<String>, value: NodeId) -> NodeId {
        self.alloc(
            Expr::Property {
                key: PropKey::Ident(key.into()),
                value,
                shorthand: false,
            },
            None,
        )
    }

    pub fn string(&mut self, value: impl Into<String>) -> NodeId {
        self.alloc(Expr::Literal(Literal::string(value)), None)
    }

    pub fn number(&mut self, value: f64) -> NodeId {
        self.alloc(Expr::Literal(Literal::number(value)), None)
    }

    pub fn boolean(&mut self, value: bool) -> NodeId {
        self.alloc(Expr::Literal(Literal::Bool(value)), None)
    }

    pub fn null(&mut self) -> NodeId {
        self.alloc(Expr::Literal(Literal::Null), None)
    }
}

// ============================================================================
// canonical forms
// ============================================================================

impl Ast {
    /// `{}`, the options argument of a canonical call.
    pub fn empty_options(&mut self) -> NodeId {
        self.object(Vec::new())
    }

    /// `namespace.selector` with a fresh namespace identifier.
    pub fn reference(&mut self, namespace: &str, selector: &str) -> NodeId {
        let root = self.identifier(namespace);
        self.member(root, selector)
    }

    /// Guard form: `reference({})`
    pub fn guard_call(&mut self, reference: NodeId) -> NodeId {
        let options = self.empty_options();
        self.call(reference, vec![options])
    }

    /// Valit form: `reference(schemas...)({})`
    pub fn valit_call(&mut self, reference: NodeId, schemas: Vec<NodeId>) -> NodeId {
        let applied = self.call(reference, schemas);
        self.options_call(applied)
    }

    /// Appends the options call: `callee({})`
    pub fn options_call(&mut self, callee: NodeId) -> NodeId {
        let options = self.empty_options();
        self.call(callee, vec![options])
    }
}
