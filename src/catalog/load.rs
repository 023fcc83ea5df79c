//! JSON inputs: the type registry and the catalog with its manifolds.
//!
//! registry.json:
//! {
//!   "types": {
//!     "package": ["ensure", "provider"],
//!     "yumrepo": ["baseurl", "descr", "enabled"]
//!   }
//! }
//!
//! catalog.json:
//! {
//!   "resources": [
//!     { "type": "package", "title": "foo", "attributes": { "tag": ["internal"] } }
//!   ],
//!   "edges": [["Yumrepo[internal]", "Manifold[internal]"]],
//!   "manifolds": [
//!     { "title": "internal", "type": "package", "match": "tag",
//!       "pattern": "internal", "relationship": "before" }
//!   ]
//! }
//!
//! We normalize names, reject duplicates, check that pre-existing edges point
//! at declared resources, and validate every manifold declaration.

use crate::catalog::{Catalog, Edge, Resource, ResourceRef, Value};
use crate::diagnostics;
use crate::manifold::{MANIFOLD_TYPE, Manifold};
use crate::registry::{Registry, TypeRegistry, TypeSchema};
use crate::spec::{Ident, RuleDecl};

use anyhow::{Context, bail};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrySpec {
    #[serde(default)]
    pub types: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSpec {
    #[serde(default)]
    pub resources: Vec<RawResource>,

    #[serde(default)]
    pub edges: Vec<[String; 2]>,

    #[serde(default)]
    pub manifolds: Vec<RuleDecl>,
}

/// Raw resource shape as it appears in catalog.json.
#[derive(Debug, Clone, Deserialize)]
pub struct RawResource {
    #[serde(rename = "type")]
    pub type_name: String,

    pub title: String,

    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}

/// Catalog plus the validated manifolds declared alongside it.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub manifolds: Vec<Manifold>,
}

impl RegistrySpec {
    /// Normalize type names and build the registry. Names that collide after
    /// lowercasing are rejected, as is redefining `manifold`.
    pub fn validate_and_build(&self) -> anyhow::Result<Registry> {
        let mut registry = Registry::new();
        let mut seen: BTreeSet<Ident> = BTreeSet::new();
        for (name, attributes) in &self.types {
            let ident = Ident::new(name);
            if ident.as_str() == MANIFOLD_TYPE {
                bail!(
                    "{}",
                    diagnostics::error_message("registry.json must not redefine the manifold type")
                );
            }
            if !seen.insert(ident.clone()) {
                bail!(
                    "{}",
                    diagnostics::error_message(format!(
                        "duplicate type in registry.json: {}",
                        name
                    ))
                );
            }
            registry.insert(ident, TypeSchema::new(attributes));
        }
        Ok(registry)
    }
}

impl CatalogSpec {
    /// Build the catalog and validate manifolds against `registry`.
    ///
    /// Phases:
    /// 1) Normalize resources, reject duplicate references.
    /// 2) Validate manifold declarations (unique titles, rule checks).
    /// 3) Resolve pre-existing edges against resources and manifold anchors.
    pub fn validate_and_build<R: TypeRegistry + ?Sized>(
        &self,
        registry: &R,
    ) -> anyhow::Result<LoadedCatalog> {
        // Phase 1: resources.
        let mut catalog = Catalog::new();
        let mut refs: BTreeSet<ResourceRef> = BTreeSet::new();
        for raw in &self.resources {
            let mut resource = Resource::new(&raw.type_name, raw.title.clone());
            for (name, value) in &raw.attributes {
                resource.attributes.insert(Ident::new(name), value.clone());
            }

            let reference = resource.reference();
            if !refs.insert(reference.clone()) {
                bail!(
                    "{}",
                    diagnostics::error_message(format!(
                        "duplicate resource in catalog.json: {}",
                        reference
                    ))
                );
            }
            if registry.resolve_type(&resource.type_name).is_none() {
                diagnostics::warn(format!(
                    "{} has a type that is not in the registry",
                    reference
                ));
            }
            catalog.add_resource(resource);
        }

        // Phase 2: manifolds.
        let mut manifolds: Vec<Manifold> = Vec::new();
        let mut titles: BTreeSet<ResourceRef> = BTreeSet::new();
        for decl in &self.manifolds {
            let manifold = Manifold::declare(decl, registry).with_context(|| {
                diagnostics::error_message(format!("invalid manifold '{}'", decl.title))
            })?;

            let reference = manifold.reference().clone();
            if !titles.insert(reference.clone()) || refs.contains(&reference) {
                bail!(
                    "{}",
                    diagnostics::error_message(format!(
                        "duplicate manifold in catalog.json: {}",
                        reference
                    ))
                );
            }
            manifolds.push(manifold);
        }

        // Phase 3: edges.
        for [src, dst] in &self.edges {
            let source = parse_ref(src)?;
            let target = parse_ref(dst)?;
            for r in [&source, &target] {
                if !refs.contains(r) && !titles.contains(r) {
                    bail!(
                        "{}",
                        diagnostics::error_message(format!(
                            "edge references unknown resource: {}",
                            r
                        ))
                    );
                }
            }
            catalog.add_edge(Edge::new(source, target));
        }

        Ok(LoadedCatalog { catalog, manifolds })
    }
}

fn parse_ref(s: &str) -> anyhow::Result<ResourceRef> {
    s.parse::<ResourceRef>()
        .map_err(|e| anyhow::anyhow!(diagnostics::error_message(e)))
}

/// Read and build registry.json.
pub fn load_registry(path: &str) -> anyhow::Result<Registry> {
    let text = fs::read_to_string(path)
        .with_context(|| diagnostics::error_message(format!("read registry file {}", path)))?;
    let spec: RegistrySpec = serde_json::from_str(&text)
        .with_context(|| diagnostics::error_message(format!("parse registry file {}", path)))?;
    spec.validate_and_build()
}

/// Read and build catalog.json.
pub fn load_catalog<R: TypeRegistry + ?Sized>(
    path: &str,
    registry: &R,
) -> anyhow::Result<LoadedCatalog> {
    let text = fs::read_to_string(path)
        .with_context(|| diagnostics::error_message(format!("read catalog file {}", path)))?;
    let spec: CatalogSpec = serde_json::from_str(&text)
        .with_context(|| diagnostics::error_message(format!("parse catalog file {}", path)))?;
    spec.validate_and_build(registry)
}
