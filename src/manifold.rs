//! The manifold anchor: a resource owning one rule, plus catalog finalization.
//!
//! A manifold is like an anchor, but used for defining many relationships at
//! once:
//!
//! ```text
//! manifold { 'internal':
//!   type         => 'package',
//!   match        => 'tag',
//!   pattern      => 'internal',
//!   relationship => before,
//! }
//! ```
//!
//! Finalization runs each manifold once against the catalog, after all
//! resources are known and before anything executes.

use crate::catalog::{Catalog, EdgeSet, Resource, ResourceRef, Value};
use crate::error::Result;
use crate::registry::TypeRegistry;
use crate::spec::{RuleDecl, RuleSpec};
use crate::synth;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

pub const MANIFOLD_TYPE: &str = "manifold";

/// Resources that can receive a refresh signal.
pub trait Refresh {
    fn refresh(&self);
}

#[derive(Debug, Clone)]
pub struct Manifold {
    rule: RuleSpec,
}

impl Manifold {
    pub fn declare<R: TypeRegistry + ?Sized>(decl: &RuleDecl, registry: &R) -> Result<Self> {
        Ok(Self {
            rule: decl.validate_and_build(registry)?,
        })
    }

    pub fn reference(&self) -> &ResourceRef {
        self.rule.anchor()
    }

    pub fn rule(&self) -> &RuleSpec {
        &self.rule
    }

    /// Add this manifold's relationships to `catalog`.
    pub fn autorequire<R: TypeRegistry + ?Sized>(
        &self,
        registry: &R,
        catalog: Option<&mut Catalog>,
    ) -> Result<EdgeSet> {
        synth::synthesize(&self.rule, registry, catalog)
    }

    /// Catalog form of the anchor.
    pub fn as_resource(&self) -> Resource {
        let rule = &self.rule;
        Resource::new(MANIFOLD_TYPE, rule.anchor().title.clone())
            .with_attribute("type", rule.target_type().to_string())
            .with_attribute("match", rule.match_attribute().to_string())
            .with_attribute("pattern", rule.pattern().to_string())
            .with_attribute("invert", Value::from(rule.invert().to_string()))
            .with_attribute("relationship", rule.relationship().to_string())
    }
}

impl Refresh for Manifold {
    // No-op: a manifold only needs to be refresh aware so propagation chains
    // through it stay intact.
    fn refresh(&self) {
        trace!(anchor = %self.reference(), "refresh absorbed by manifold");
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FinalizeReport {
    /// Edges emitted per manifold.
    pub added: BTreeMap<ResourceRef, EdgeSet>,
    /// Every resource signalled for refresh during finalization.
    pub refreshed: BTreeSet<ResourceRef>,
}

impl FinalizeReport {
    pub fn edge_count(&self) -> usize {
        self.added.values().map(BTreeSet::len).sum()
    }
}

/// Run every manifold against `catalog` in declaration order.
///
/// Anchors missing from the catalog are added as `manifold` resources first so
/// that each synthesized edge has both endpoints present. Refresh signals that
/// land on a manifold terminate there.
pub fn finalize<R: TypeRegistry + ?Sized>(
    catalog: &mut Catalog,
    manifolds: &[Manifold],
    registry: &R,
) -> Result<FinalizeReport> {
    for m in manifolds {
        if !catalog.contains(m.reference()) {
            catalog.add_resource(m.as_resource());
        }
    }

    let mut report = FinalizeReport::default();
    for m in manifolds {
        let edges = m.autorequire(registry, Some(&mut *catalog))?;
        // Manifolds sharing an anchor report under one entry.
        report
            .added
            .entry(m.reference().clone())
            .or_default()
            .extend(edges);
    }

    let by_ref: BTreeMap<&ResourceRef, &Manifold> =
        manifolds.iter().map(|m| (m.reference(), m)).collect();
    for signalled in catalog.refreshed() {
        if let Some(m) = by_ref.get(signalled) {
            m.refresh();
        }
    }
    report.refreshed = catalog.refreshed().clone();

    Ok(report)
}
