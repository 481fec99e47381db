//! Type registry for the desugaring pass.
//!
//! The registry decides which member accesses count as schema references:
//! - `aliases`: identifiers naming the schema namespace (`v`, `vality`)
//! - `guards`: types configured only by options, canonical form `R.g({})`
//! - `valits`: types taking sub-schemas, canonical form `R.v(...)({})`
//!
//! It also names the selectors synthesized when expanding literal shorthand.
//! The table is loaded from TOML, so adding a type never touches the rewriter.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default registry shipped with the crate.
const BUILTIN: &str = include_str!("../registry.toml");

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid registry: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("registry declares no namespace aliases")]
    NoAliases,

    #[error("'{0}' is not a valid identifier")]
    InvalidName(String),

    #[error("expansion selector '{0}' is not a registered valit")]
    UnregisteredSelector(String),

    #[error("shape '{0}' is not a registered valit")]
    UnregisteredShape(String),

    #[error("object selector '{0}' is not listed in shapes")]
    ObjectNotShape(String),
}

/// Selectors emitted when literal shorthand is expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpandSelectors {
    /// Singleton array: `[x]` becomes `R.array(x)({})`.
    pub array: String,
    /// Other arrays: `[a, b]` becomes `R.enum(a, b)({})`.
    #[serde(rename = "enum")]
    pub enumeration: String,
    /// Object literal: `{ k: x }` becomes `R.object({ k: x })({})`.
    pub object: String,
    /// Primitive literal: `1` becomes `R.literal(1)({})`.
    pub literal: String,
}

impl Default for ExpandSelectors {
    fn default() -> Self {
        Self {
            array: "array".into(),
            enumeration: "enum".into(),
            object: "object".into(),
            literal: "literal".into(),
        }
    }
}

impl ExpandSelectors {
    fn iter(&self) -> impl Iterator<Item = &str> {
        [
            self.array.as_str(),
            self.enumeration.as_str(),
            self.object.as_str(),
            self.literal.as_str(),
        ]
        .into_iter()
    }
}

/// Classification table for schema references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Registry {
    aliases: Vec<String>,
    #[serde(default)]
    guards: BTreeSet<String>,
    #[serde(default)]
    valits: BTreeSet<String>,
    #[serde(default)]
    shapes: BTreeSet<String>,
    #[serde(default)]
    expand: ExpandSelectors,
}

impl Registry {
    /// The registry shipped in `registry.toml`.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_toml(BUILTIN)
    }

    /// Load a registry from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate a registry from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, RegistryError> {
        let registry: Registry = toml::from_str(contents)?;
        registry.validate()?;
        Ok(registry)
    }

    fn validate(&self) -> Result<(), RegistryError> {
        if self.aliases.is_empty() {
            return Err(RegistryError::NoAliases);
        }

        let names = self
            .aliases
            .iter()
            .chain(&self.guards)
            .chain(&self.valits)
            .chain(&self.shapes)
            .map(String::as_str)
            .chain(self.expand.iter());
        for name in names {
            if !is_identifier(name) {
                return Err(RegistryError::InvalidName(name.to_string()));
            }
        }

        if let Some(shape) = self.shapes.iter().find(|shape| !self.valits.contains(*shape)) {
            return Err(RegistryError::UnregisteredShape(shape.clone()));
        }

        // Expanded output has to classify as a valit.
        if let Some(selector) = self.expand.iter().find(|sel| !self.valits.contains(*sel)) {
            return Err(RegistryError::UnregisteredSelector(selector.to_string()));
        }

        if !self.shapes.contains(&self.expand.object) {
            return Err(RegistryError::ObjectNotShape(self.expand.object.clone()));
        }

        Ok(())
    }

    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.iter().any(|alias| alias == name)
    }

    pub fn is_guard(&self, name: &str) -> bool {
        self.guards.contains(name)
    }

    pub fn is_valit(&self, name: &str) -> bool {
        self.valits.contains(name)
    }

    /// Valits whose object-literal argument is a field map.
    pub fn is_shape(&self, name: &str) -> bool {
        self.shapes.contains(name)
    }

    /// Alias used when a unit never references the namespace.
    pub fn primary_alias(&self) -> &str {
        // Non-empty by validation.
        &self.aliases[0]
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn guards(&self) -> impl Iterator<Item = &str> {
        self.guards.iter().map(String::as_str)
    }

    pub fn valits(&self) -> impl Iterator<Item = &str> {
        self.valits.iter().map(String::as_str)
    }

    pub fn expand(&self) -> &ExpandSelectors {
        &self.expand
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        aliases = ["s"]
        guards = ["email"]
        valits = ["array", "enum", "object", "literal", "list"]
        shapes = ["object"]
    "#;

    #[test]
    fn test_load_builtin() {
        let registry = Registry::builtin().expect("Failed to load registry");
        assert_eq!(registry.aliases(), ["v", "vality"]);
        assert_eq!(registry.primary_alias(), "v");
        assert!(registry.is_guard("number"));
        assert!(registry.is_valit("array"));
        assert!(registry.is_shape("object"));
        assert!(!registry.is_guard("array"));
        assert!(!registry.is_valit("number"));
    }

    #[test]
    fn test_builtin_guard_and_valit_names() {
        let registry = Registry::builtin().unwrap();
        let guards: Vec<&str> = registry.guards().collect();
        let valits: Vec<&str> = registry.valits().collect();

        for name in ["string", "number", "boolean", "date"] {
            assert!(guards.contains(&name), "{} should be a guard", name);
        }
        for name in ["array", "tuple", "object", "enum", "literal", "optional"] {
            assert!(valits.contains(&name), "{} should be a valit", name);
        }
    }

    #[test]
    fn test_from_toml_defaults_expand() {
        let registry = Registry::from_toml(MINIMAL).unwrap();
        assert_eq!(registry.expand(), &ExpandSelectors::default());
        assert!(registry.is_alias("s"));
        assert!(!registry.is_alias("v"));
        assert!(registry.is_guard("email"));
    }

    #[test]
    fn test_name_may_be_guard_and_valit() {
        let registry = Registry::from_toml(
            r#"
            aliases = ["v"]
            guards = ["maybe"]
            valits = ["maybe", "array", "enum", "object", "literal"]
            shapes = ["object"]
            "#,
        )
        .unwrap();
        assert!(registry.is_guard("maybe"));
        assert!(registry.is_valit("maybe"));
    }

    #[test]
    fn test_no_aliases() {
        let err = Registry::from_toml("aliases = []").unwrap_err();
        assert!(matches!(err, RegistryError::NoAliases));
    }

    #[test]
    fn test_invalid_name() {
        let err = Registry::from_toml(
            r#"
            aliases = ["v"]
            guards = ["not-a-name"]
            valits = ["array", "enum", "object", "literal"]
            shapes = ["object"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidName(name) if name == "not-a-name"));
    }

    #[test]
    fn test_unregistered_selector() {
        let err = Registry::from_toml(
            r#"
            aliases = ["v"]
            valits = ["array", "object", "literal"]
            shapes = ["object"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::UnregisteredSelector(name) if name == "enum"));
    }

    #[test]
    fn test_object_selector_must_be_shape() {
        let err = Registry::from_toml(
            r#"
            aliases = ["v"]
            valits = ["array", "enum", "object", "literal"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::ObjectNotShape(name) if name == "object"));
    }

    #[test]
    fn test_unknown_field() {
        let err = Registry::from_toml("aliases = [\"v\"]\nvalidators = []").unwrap_err();
        assert!(matches!(err, RegistryError::Toml(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.toml");
        fs::write(&path, MINIMAL).unwrap();

        let registry = Registry::from_file(&path).unwrap();
        assert!(registry.is_valit("list"));

        let missing = Registry::from_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, RegistryError::Io { .. }));
        assert!(missing.to_string().contains("missing.toml"));
    }

    #[test]
    fn test_dump_json() {
        let registry = Registry::builtin().unwrap();
        let json = serde_json::to_value(&registry).unwrap();
        assert_eq!(json["aliases"][0], "v");
        assert_eq!(json["expand"]["enum"], "enum");
        assert!(json["guards"].as_array().unwrap().contains(&"number".into()));
    }
}
