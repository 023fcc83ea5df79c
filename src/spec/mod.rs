//! Rule layer: raw declarations + validated in-memory rules.
//!
//! This module is intentionally separate from the catalog and the synthesizer.
//! It owns:
//! - Ident (normalized type/attribute/relationship names)
//! - Pattern (literal or regex)
//! - RuleDecl / RuleSpec (declaration and validated rule)

pub mod ident;
pub mod pattern;
pub mod rule;

pub use ident::{Ident, normalize_identifier};
pub use pattern::{Pattern, parse_pattern};
pub use rule::{InvertValue, Relationship, RuleDecl, RuleSpec};
