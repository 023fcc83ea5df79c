//! Catalog: resources plus the ordering edges between them.
//!
//! The catalog is only ever grown during finalization. Edges and refresh
//! signals are kept in ordered sets so output is deterministic.

pub mod load;
pub mod resource;

pub use load::{CatalogSpec, LoadedCatalog, RegistrySpec};
pub use resource::{Resource, ResourceRef, Value};

use crate::spec::Ident;
use serde::Serialize;
use std::collections::BTreeSet;

/// Directed edge: `source` must happen before `target`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Edge {
    pub source: ResourceRef,
    pub target: ResourceRef,
}

impl Edge {
    pub fn new(source: ResourceRef, target: ResourceRef) -> Self {
        Self { source, target }
    }
}

pub type EdgeSet = BTreeSet<Edge>;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    resources: Vec<Resource>,
    edges: EdgeSet,
    refreshed: BTreeSet<ResourceRef>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resources(resources: impl IntoIterator<Item = Resource>) -> Self {
        Self {
            resources: resources.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn add_resource(&mut self, resource: Resource) {
        self.resources.push(resource);
    }

    pub fn contains(&self, reference: &ResourceRef) -> bool {
        self.resources
            .iter()
            .any(|r| r.type_name == reference.type_name && r.title == reference.title)
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Resources whose type tag is exactly `type_name`.
    pub fn resources_of_type<'a>(
        &'a self,
        type_name: &'a Ident,
    ) -> impl Iterator<Item = &'a Resource> + 'a {
        self.resources
            .iter()
            .filter(move |r| &r.type_name == type_name)
    }

    /// Returns false if the edge was already present.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        self.edges.insert(edge)
    }

    pub fn edges(&self) -> &EdgeSet {
        &self.edges
    }

    /// Record a refresh signal for `reference`. Returns false if already signalled.
    pub fn mark_refresh(&mut self, reference: &ResourceRef) -> bool {
        self.refreshed.insert(reference.clone())
    }

    pub fn refreshed(&self) -> &BTreeSet<ResourceRef> {
        &self.refreshed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_by_exact_type() {
        let catalog = Catalog::with_resources([
            Resource::new("package", "foo"),
            Resource::new("yumrepo", "internal"),
            Resource::new("package", "bar"),
        ]);
        let ty = Ident::new("package");
        let titles: Vec<&str> = catalog
            .resources_of_type(&ty)
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, vec!["foo", "bar"]);
    }

    #[test]
    fn edges_and_refresh_are_deduplicated() {
        let mut catalog = Catalog::new();
        let a = ResourceRef::new("manifold", "a");
        let b = ResourceRef::new("package", "b");
        assert!(catalog.add_edge(Edge::new(a.clone(), b.clone())));
        assert!(!catalog.add_edge(Edge::new(a, b.clone())));
        assert!(catalog.mark_refresh(&b));
        assert!(!catalog.mark_refresh(&b));
        assert_eq!(catalog.edges().len(), 1);
        assert_eq!(catalog.refreshed().len(), 1);
    }

    #[test]
    fn contains_matches_type_and_title() {
        let catalog = Catalog::with_resources([Resource::new("package", "foo")]);
        assert!(catalog.contains(&ResourceRef::new("Package", "foo")));
        assert!(!catalog.contains(&ResourceRef::new("service", "foo")));
    }
}
