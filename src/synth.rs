//! Relationship synthesis: scan the catalog, match, emit edges.

use crate::catalog::{Catalog, EdgeSet, Resource, ResourceRef, Value};
use crate::diagnostics;
use crate::error::{Error, Result};
use crate::registry::TypeRegistry;
use crate::spec::{Ident, RuleSpec};
use tracing::{debug, info};

/// Run `rule` against `catalog`, adding edges (and refresh signals) to it.
///
/// Returns the edges this rule emitted. Resources are selected by exact type
/// identity; aliases and composite types are not expanded.
pub fn synthesize<R: TypeRegistry + ?Sized>(
    rule: &RuleSpec,
    registry: &R,
    catalog: Option<&mut Catalog>,
) -> Result<EdgeSet> {
    let catalog = catalog.ok_or(Error::MissingCatalog)?;
    if registry.resolve_type(rule.target_type()).is_none() {
        return Err(Error::UnknownType(rule.target_type().clone()));
    }

    // Collect first: the scan borrows the catalog immutably.
    let matched: Vec<ResourceRef> = catalog
        .resources_of_type(rule.target_type())
        .filter(|res| {
            let hit = matches(rule, res);
            debug!(
                anchor = %rule.anchor(),
                resource = %res.reference(),
                matched = hit,
                "manifold match"
            );
            hit
        })
        .map(Resource::reference)
        .collect();

    let relationship = rule.relationship();
    let mut added = EdgeSet::new();
    for res in matched {
        if relationship.signals_refresh() {
            catalog.mark_refresh(&res);
        }
        let edge = relationship.edge(rule.anchor(), &res);
        catalog.add_edge(edge.clone());
        added.insert(edge);
    }

    if added.is_empty() {
        diagnostics::warn(format!(
            "{} matched no {} resources on {} = {}",
            rule.anchor(),
            rule.target_type(),
            rule.match_attribute(),
            rule.pattern()
        ));
    }
    info!(
        anchor = %rule.anchor(),
        relationship = %relationship,
        edges = added.len(),
        "manifold synthesized"
    );
    Ok(added)
}

/// Membership decision for a single resource.
///
/// Inversion negates the computed `found` result.
pub fn matches(rule: &RuleSpec, res: &Resource) -> bool {
    let values = comparison_values(res, rule.match_attribute());
    let found = rule.pattern().found(&values);
    if rule.invert() { !found } else { found }
}

/// `title` selects the identifying name; an absent attribute yields no values.
fn comparison_values<'a>(res: &'a Resource, attribute: &Ident) -> Vec<&'a str> {
    if attribute.is_title() {
        return vec![res.name()];
    }
    res.attribute(attribute)
        .map(Value::as_values)
        .unwrap_or_default()
}
