//! Pattern-driven relationship synthesis for resource catalogs.
//!
//! A manifold selects every resource of one type whose attribute matches a
//! pattern and orders all of them relative to itself, so a single declaration
//! stands in for a hand-maintained list of `before`/`require` edges.

pub mod catalog;
pub mod diagnostics;
pub mod error;
pub mod graph;
pub mod manifold;
pub mod registry;
pub mod spec;
pub mod synth;

pub use catalog::{Catalog, Edge, EdgeSet, Resource, ResourceRef, Value};
pub use error::{Error, Result};
pub use manifold::{FinalizeReport, Manifold, Refresh, finalize};
pub use registry::{Registry, TypeRegistry, TypeSchema};
pub use spec::{Ident, Pattern, Relationship, RuleDecl, RuleSpec};
pub use synth::synthesize;
