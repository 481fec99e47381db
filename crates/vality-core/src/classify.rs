//! Guard / valit classification of member accesses.

use crate::Registry;
use rhizome_vality_ast::{Ast, Expr, MemberProperty, NodeId};

/// What a node refers to in the schema namespace.
///
/// Both flags are computed independently, so a registry may list a
/// name as guard and valit at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub is_guard: bool,
    pub is_valit: bool,
}

impl Classification {
    pub fn is_reference(self) -> bool {
        self.is_guard || self.is_valit
    }
}

/// Classify `id` as a guard and/or valit reference.
pub fn classify(ast: &Ast, id: NodeId, registry: &Registry) -> Classification {
    match namespace_access(ast, id, registry) {
        Some((_, selector)) => Classification {
            is_guard: registry.is_guard(selector),
            is_valit: registry.is_valit(selector),
        },
        None => Classification::default(),
    }
}

/// Splits `alias.selector` when the object is a recognised namespace alias.
///
/// Computed accesses (`v["number"]`) never match.
pub fn namespace_access<'a>(
    ast: &'a Ast,
    id: NodeId,
    registry: &Registry,
) -> Option<(&'a str, &'a str)> {
    let Expr::Member {
        object,
        property: MemberProperty::Name(selector),
    } = ast.expr(id)
    else {
        return None;
    };
    match ast.expr(*object) {
        Expr::Identifier(alias) if registry.is_alias(alias) => {
            Some((alias.as_str(), selector.as_str()))
        }
        _ => None,
    }
}

/// Selector of a valit reference.
pub fn valit_selector<'a>(ast: &'a Ast, id: NodeId, registry: &Registry) -> Option<&'a str> {
    namespace_access(ast, id, registry)
        .map(|(_, selector)| selector)
        .filter(|selector| registry.is_valit(selector))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhizome_vality_ast::NodeKind;
    use rhizome_vality_syntax_typescript::{parse, Dialect};

    fn member(source: &str) -> (Ast, NodeId) {
        let ast = parse(source, Dialect::TypeScript).expect("parse failed");
        let id = ast
            .descendants()
            .into_iter()
            .find(|&id| ast.kind(id) == NodeKind::Member)
            .expect("no member access");
        (ast, id)
    }

    fn classify_source(source: &str) -> Classification {
        let registry = Registry::builtin().unwrap();
        let (ast, id) = member(source);
        classify(&ast, id, &registry)
    }

    #[test]
    fn test_guard() {
        let class = classify_source("v.number;");
        assert!(class.is_guard);
        assert!(!class.is_valit);
        assert!(class.is_reference());
    }

    #[test]
    fn test_valit() {
        let class = classify_source("vality.array;");
        assert!(!class.is_guard);
        assert!(class.is_valit);
    }

    #[test]
    fn test_not_references() {
        // Unknown alias, unknown selector, computed access, nested object.
        for source in ["z.number;", "v.unknown;", "v[\"number\"];", "a.v.number;"] {
            assert!(!classify_source(source).is_reference(), "source: {}", source);
        }
    }

    #[test]
    fn test_non_member_nodes() {
        let registry = Registry::builtin().unwrap();
        let ast = parse("v;", Dialect::TypeScript).unwrap();
        for id in ast.descendants() {
            assert_eq!(classify(&ast, id, &registry), Classification::default());
        }
    }

    #[test]
    fn test_both_categories() {
        let registry = Registry::from_toml(
            r#"
            aliases = ["v"]
            guards = ["maybe"]
            valits = ["maybe", "array", "enum", "object", "literal"]
            shapes = ["object"]
            "#,
        )
        .unwrap();
        let (ast, id) = member("v.maybe;");
        let class = classify(&ast, id, &registry);
        assert!(class.is_guard && class.is_valit);
    }

    #[test]
    fn test_namespace_access_and_selector() {
        let registry = Registry::builtin().unwrap();
        let (ast, id) = member("vality.custom;");
        assert_eq!(namespace_access(&ast, id, &registry), Some(("vality", "custom")));
        assert_eq!(valit_selector(&ast, id, &registry), None);

        let (ast, id) = member("v.object;");
        assert_eq!(valit_selector(&ast, id, &registry), Some("object"));
    }
}
