//! Resource type registry: resolves type names to attribute schemas.

use crate::spec::Ident;
use std::collections::{BTreeMap, BTreeSet};

/// Parameters every resource type accepts regardless of its own schema.
pub const METAPARAMS: &[&str] = &[
    "alias",
    "audit",
    "before",
    "loglevel",
    "noop",
    "notify",
    "require",
    "schedule",
    "stage",
    "subscribe",
    "tag",
];

/// Attributes of the `manifold` type itself.
pub const MANIFOLD_ATTRIBUTES: &[&str] = &["type", "match", "pattern", "invert", "relationship"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSchema {
    attributes: BTreeSet<Ident>,
}

impl TypeSchema {
    pub fn new<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            attributes: attributes.into_iter().map(Ident::new).collect(),
        }
    }

    /// True for declared attributes and for metaparameters.
    pub fn has_attribute(&self, name: &Ident) -> bool {
        self.attributes.contains(name) || METAPARAMS.contains(&name.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Ident> {
        self.attributes.iter()
    }
}

pub trait TypeRegistry {
    fn resolve_type(&self, name: &Ident) -> Option<&TypeSchema>;
}

/// In-memory registry. Always knows the `manifold` type.
#[derive(Debug, Clone)]
pub struct Registry {
    types: BTreeMap<Ident, TypeSchema>,
}

impl Registry {
    pub fn new() -> Self {
        let mut types = BTreeMap::new();
        types.insert(
            Ident::new(crate::manifold::MANIFOLD_TYPE),
            TypeSchema::new(MANIFOLD_ATTRIBUTES),
        );
        Self { types }
    }

    pub fn with_type<I, S>(mut self, name: &str, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.insert(Ident::new(name), TypeSchema::new(attributes));
        self
    }

    /// Register `schema` under `name`, returning the schema it replaced.
    pub fn insert(&mut self, name: Ident, schema: TypeSchema) -> Option<TypeSchema> {
        self.types.insert(name, schema)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &Ident> {
        self.types.keys()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry for Registry {
    fn resolve_type(&self, name: &Ident) -> Option<&TypeSchema> {
        self.types.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metaparams_are_valid_for_every_type() {
        let reg = Registry::new().with_type("package", ["ensure"]);
        let schema = reg.resolve_type(&Ident::new("package")).unwrap();
        assert!(schema.has_attribute(&Ident::new("ensure")));
        assert!(schema.has_attribute(&Ident::new("tag")));
        assert!(!schema.has_attribute(&Ident::new("baseurl")));
    }

    #[test]
    fn manifold_type_is_builtin() {
        let reg = Registry::new();
        let schema = reg.resolve_type(&Ident::new("Manifold")).unwrap();
        assert!(schema.has_attribute(&Ident::new("relationship")));
        assert!(reg.resolve_type(&Ident::new("package")).is_none());
    }

    #[test]
    fn schema_attributes_are_normalized() {
        let schema = TypeSchema::new(["BaseURL"]);
        assert!(schema.has_attribute(&Ident::new("baseurl")));
        assert_eq!(schema.attributes().count(), 1);
    }
}
