//! The desugaring walk.
//!
//! Expansion rules:
//!
//! | input                | output                       |
//! |----------------------|------------------------------|
//! | `R.guard`            | `R.guard({})`                |
//! | `R.valit`            | `R.valit()({})`              |
//! | `R.guard(opts)`      | unchanged                    |
//! | `R.valit(xs)(opts)`  | sub-schemas `xs` rewritten   |
//! | `f(args)`            | `f(args)({})`                |
//! | `[x]`                | `R.array(x)({})`             |
//! | `[a, b, ...]`, `[]`  | `R.enum(a, b, ...)({})`      |
//! | `{ k: x }`           | `R.object({ k: x })({})`     |
//! | `1`, `"s"`, `true`   | `R.literal(1)({})`           |
//!
//! Literal rules only fire in schema context (see [`crate::oracle`]).
//! Every rule marks its output processed, so nothing is expanded twice.

use crate::classify::{classify, namespace_access, valit_selector};
use crate::oracle::{ancestor_contains_shorthand, contains_shorthand};
use crate::Registry;
use rhizome_vality_ast::{Ast, Expr, NodeId, NodeKind};
use serde::Serialize;
use tracing::{debug, trace};

/// Rules applied during one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Bare guard references given their options call.
    pub guards: usize,
    /// Bare valit references given both calls.
    pub valits: usize,
    /// Calls given a trailing options call.
    pub wrapped_calls: usize,
    /// Singleton arrays expanded to array-of.
    pub arrays: usize,
    pub enums: usize,
    pub objects: usize,
    pub literals: usize,
}

impl Stats {
    pub fn total(&self) -> usize {
        self.guards
            + self.valits
            + self.wrapped_calls
            + self.arrays
            + self.enums
            + self.objects
            + self.literals
    }
}

/// The Vality desugaring pass.
#[derive(Debug, Clone)]
pub struct Desugar {
    registry: Registry,
}

impl Desugar {
    /// Plugin name a host registers the pass under.
    pub const NAME: &'static str = "vality";

    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Node kinds the walk dispatches on; everything else is only descended into.
    pub fn visits() -> &'static [NodeKind] {
        &[
            NodeKind::Member,
            NodeKind::Call,
            NodeKind::Array,
            NodeKind::Object,
            NodeKind::Literal,
        ]
    }

    /// Rewrite the tree in place.
    ///
    /// Subtrees already marked processed are skipped, so a host can fence
    /// off regions before running the pass.
    pub fn run(&self, ast: &mut Ast) -> Stats {
        let Some(root) = ast.root() else {
            return Stats::default();
        };

        let namespace = self.namespace(ast);
        let mut walk = Walk {
            registry: &self.registry,
            namespace,
            stats: Stats::default(),
        };
        walk.visit(ast, root);

        let stats = walk.stats;
        debug!(
            namespace = %walk.namespace,
            guards = stats.guards,
            valits = stats.valits,
            wrapped_calls = stats.wrapped_calls,
            arrays = stats.arrays,
            enums = stats.enums,
            objects = stats.objects,
            literals = stats.literals,
            "desugar pass complete"
        );
        stats
    }

    /// First namespace alias referenced in the unit, else the primary alias.
    fn namespace(&self, ast: &Ast) -> String {
        ast.descendants()
            .into_iter()
            .find_map(|id| namespace_access(ast, id, &self.registry))
            .map(|(alias, _)| alias)
            .unwrap_or_else(|| self.registry.primary_alias())
            .to_string()
    }
}

struct Walk<'r> {
    registry: &'r Registry,
    /// Alias used for synthesized references.
    namespace: String,
    stats: Stats,
}

impl Walk<'_> {
    fn visit(&mut self, ast: &mut Ast, id: NodeId) {
        if ast.is_processed(id) {
            return;
        }
        trace!(node = ?id, kind = ?ast.kind(id), "visit");

        match ast.kind(id) {
            NodeKind::Member => self.visit_member(ast, id),
            NodeKind::Call => self.visit_call(ast, id),
            NodeKind::Array => self.visit_array(ast, id),
            NodeKind::Object => self.visit_object(ast, id),
            NodeKind::Literal => self.visit_literal(ast, id),
            _ => self.visit_children(ast, id),
        }
    }

    fn visit_children(&mut self, ast: &mut Ast, id: NodeId) {
        for child in ast.children(id) {
            self.visit(ast, child);
        }
    }

    fn in_schema_context(&self, ast: &Ast, id: NodeId) -> bool {
        contains_shorthand(ast, id, self.registry)
            || ancestor_contains_shorthand(ast, id, self.registry)
    }

    fn visit_member(&mut self, ast: &mut Ast, id: NodeId) {
        let class = classify(ast, id, self.registry);

        let output = if class.is_guard {
            self.stats.guards += 1;
            debug!(node = ?id, "guard reference");
            ast.replace_with(id, |ast, reference| ast.guard_call(reference))
        } else if class.is_valit {
            self.stats.valits += 1;
            debug!(node = ?id, "valit reference");
            ast.replace_with(id, |ast, reference| ast.valit_call(reference, Vec::new()))
        } else {
            id
        };

        // Member accesses are never descended into.
        ast.mark_processed(output);
    }

    fn visit_call(&mut self, ast: &mut Ast, id: NodeId) {
        let Expr::Call { callee, .. } = ast.expr(id) else {
            return;
        };
        let callee = *callee;

        // Guard calls are canonical already.
        if classify(ast, callee, self.registry).is_guard {
            ast.mark_processed(id);
            return;
        }

        // `X(args)(opts)`: canonical if X is a valit, left alone otherwise.
        if let Expr::Call {
            callee: inner_callee,
            ..
        } = ast.expr(callee)
        {
            if classify(ast, *inner_callee, self.registry).is_valit {
                self.visit_schema_arguments(ast, callee);
            }
            ast.mark_processed(id);
            return;
        }

        self.stats.wrapped_calls += 1;
        debug!(node = ?id, "options call appended");
        let output = ast.replace_with(id, |ast, call| ast.options_call(call));

        // `R.valit(args)` just became canonical; its arguments are schemas.
        if classify(ast, callee, self.registry).is_valit {
            self.visit_schema_arguments(ast, id);
        }
        ast.mark_processed(output);
    }

    /// Rewrites the arguments of `R.valit(args)`.
    ///
    /// An object literal passed to a shape valit is a field map: its values
    /// are rewritten, the literal itself is kept.
    fn visit_schema_arguments(&mut self, ast: &mut Ast, call: NodeId) {
        let Expr::Call {
            callee, arguments, ..
        } = ast.expr(call)
        else {
            return;
        };
        let shape = valit_selector(ast, *callee, self.registry)
            .is_some_and(|selector| self.registry.is_shape(selector));
        let arguments = arguments.clone();

        for argument in arguments {
            if shape && ast.kind(argument) == NodeKind::Object {
                self.visit_fields(ast, argument);
            } else {
                self.visit(ast, argument);
            }
        }
    }

    /// Rewrites property values of an object literal; spreads and methods stay.
    fn visit_fields(&mut self, ast: &mut Ast, object: NodeId) {
        let Expr::Object { members } = ast.expr(object) else {
            return;
        };
        for member in members.clone() {
            if let Expr::Property { value, .. } = ast.expr(member) {
                let value = *value;
                self.visit(ast, value);
            }
        }
    }

    fn visit_array(&mut self, ast: &mut Ast, id: NodeId) {
        if !self.in_schema_context(ast, id) {
            self.visit_children(ast, id);
            return;
        }

        let Expr::Array { elements } = ast.expr(id) else {
            return;
        };
        let sparse = elements.iter().any(Option::is_none);

        for element in elements.iter().flatten().copied().collect::<Vec<_>>() {
            if ast.kind(element) != NodeKind::Spread {
                self.visit(ast, element);
            }
        }

        // Holes have no schema form: the array itself stays, its elements are rewritten.
        if sparse {
            debug!(node = ?id, "sparse array kept");
            return;
        }

        // Re-read: visiting replaced the element slots.
        let Expr::Array { elements } = ast.expr(id) else {
            return;
        };
        let elements: Vec<NodeId> = elements.iter().flatten().copied().collect();
        let singleton = elements.len() == 1 && ast.kind(elements[0]) != NodeKind::Spread;

        let selector = if singleton {
            self.stats.arrays += 1;
            debug!(node = ?id, "array-of shorthand");
            self.registry.expand().array.clone()
        } else {
            self.stats.enums += 1;
            debug!(node = ?id, alternatives = elements.len(), "enum shorthand");
            self.registry.expand().enumeration.clone()
        };

        let namespace = self.namespace.clone();
        let output = ast.replace_with(id, |ast, _| {
            let reference = ast.reference(&namespace, &selector);
            ast.valit_call(reference, elements)
        });
        ast.mark_processed(output);
    }

    fn visit_object(&mut self, ast: &mut Ast, id: NodeId) {
        if !self.in_schema_context(ast, id) {
            self.visit_children(ast, id);
            return;
        }

        self.visit_fields(ast, id);

        self.stats.objects += 1;
        debug!(node = ?id, "object shorthand");
        let namespace = self.namespace.clone();
        let selector = self.registry.expand().object.clone();
        let output = ast.replace_with(id, |ast, object| {
            let reference = ast.reference(&namespace, &selector);
            ast.valit_call(reference, vec![object])
        });
        ast.mark_processed(output);
    }

    fn visit_literal(&mut self, ast: &mut Ast, id: NodeId) {
        if !ancestor_contains_shorthand(ast, id, self.registry) {
            ast.mark_processed(id);
            return;
        }

        self.stats.literals += 1;
        debug!(node = ?id, "literal shorthand");
        let namespace = self.namespace.clone();
        let selector = self.registry.expand().literal.clone();
        let output = ast.replace_with(id, |ast, literal| {
            let reference = ast.reference(&namespace, &selector);
            ast.valit_call(reference, vec![literal])
        });
        ast.mark_processed(output);
    }
}
