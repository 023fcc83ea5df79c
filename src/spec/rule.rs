//! Rule declarations and their validated form.
//!
//! Declaration shape (one entry of `manifolds` in catalog.json):
//! {
//!   "title": "internal",
//!   "type": "package",          // optional, defaults to the title
//!   "match": "tag",             // attribute name or "title"
//!   "pattern": "internal",      // literal, or "/regex/"
//!   "invert": false,            // bool or "true"/"false"
//!   "relationship": "before"    // before | require | subscribe | notify
//! }
//!
//! `RuleDecl` is the raw serde shape; `RuleSpec` is the validated, immutable
//! rule owned by its anchor.

use crate::catalog::{Edge, ResourceRef};
use crate::error::{Error, Result};
use crate::manifold::MANIFOLD_TYPE;
use crate::registry::TypeRegistry;
use crate::spec::ident::{Ident, normalize_identifier};
use crate::spec::pattern::{Pattern, parse_pattern};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Before,
    Require,
    Subscribe,
    Notify,
}

impl Relationship {
    pub fn parse(name: &Ident) -> Option<Self> {
        match name.as_str() {
            "before" => Some(Relationship::Before),
            "require" => Some(Relationship::Require),
            "subscribe" => Some(Relationship::Subscribe),
            "notify" => Some(Relationship::Notify),
            _ => None,
        }
    }

    /// subscribe/notify also send a refresh signal to the matched resource.
    pub fn signals_refresh(self) -> bool {
        matches!(self, Relationship::Subscribe | Relationship::Notify)
    }

    /// Edge between the anchor and a matched resource.
    pub fn edge(self, anchor: &ResourceRef, matched: &ResourceRef) -> Edge {
        match self {
            Relationship::Before | Relationship::Subscribe => {
                Edge::new(anchor.clone(), matched.clone())
            }
            Relationship::Require | Relationship::Notify => {
                Edge::new(matched.clone(), anchor.clone())
            }
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Relationship::Before => "before",
            Relationship::Require => "require",
            Relationship::Subscribe => "subscribe",
            Relationship::Notify => "notify",
        };
        f.write_str(s)
    }
}

/// Raw `invert` value: a boolean or its string spelling.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum InvertValue {
    Bool(bool),
    Text(String),
}

impl InvertValue {
    fn to_bool(&self) -> Option<bool> {
        match self {
            InvertValue::Bool(b) => Some(*b),
            InvertValue::Text(s) => match s.to_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDecl {
    pub title: String,

    #[serde(default, rename = "type")]
    pub target_type: Option<String>,

    #[serde(default, rename = "match")]
    pub match_attribute: Option<String>,

    #[serde(default)]
    pub pattern: Option<String>,

    #[serde(default)]
    pub invert: Option<InvertValue>,

    #[serde(default)]
    pub relationship: Option<String>,
}

/// Validated rule. Immutable once built.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    anchor: ResourceRef,
    target_type: Ident,
    match_attribute: Ident,
    pattern: Pattern,
    invert: bool,
    relationship: Relationship,
}

impl RuleDecl {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn target_type(mut self, value: &str) -> Self {
        self.target_type = Some(value.to_string());
        self
    }

    pub fn match_on(mut self, value: &str) -> Self {
        self.match_attribute = Some(value.to_string());
        self
    }

    pub fn pattern(mut self, value: &str) -> Self {
        self.pattern = Some(value.to_string());
        self
    }

    pub fn invert(mut self, value: bool) -> Self {
        self.invert = Some(InvertValue::Bool(value));
        self
    }

    pub fn relationship(mut self, value: &str) -> Self {
        self.relationship = Some(value.to_string());
        self
    }

    pub fn anchor(&self) -> ResourceRef {
        ResourceRef::new(MANIFOLD_TYPE, self.title.clone())
    }

    /// Check the declaration without keeping the built rule.
    pub fn validate<R: TypeRegistry + ?Sized>(&self, registry: &R) -> Result<()> {
        self.validate_and_build(registry).map(|_| ())
    }

    /// Validate the declaration and build a RuleSpec.
    ///
    /// Checks run in order and the first failure is returned:
    /// 1) target type resolves (falling back to the title when `type` is absent)
    /// 2) match, pattern and relationship are present
    /// 3) relationship is one of before/require/subscribe/notify
    /// 4) match is `title` or an attribute of the target type
    ///
    /// The pattern is compiled and `invert` interpreted afterwards.
    pub fn validate_and_build<R: TypeRegistry + ?Sized>(&self, registry: &R) -> Result<RuleSpec> {
        let anchor = self.anchor();

        // Phase 1: target type.
        let raw_type = self.target_type.as_deref().unwrap_or(&self.title);
        if raw_type.is_empty() {
            return Err(Error::validation(&anchor, "Required parameter missing: type"));
        }
        let target_type = normalize_identifier(raw_type);
        let schema = registry.resolve_type(&target_type).ok_or_else(|| {
            Error::validation(
                &anchor,
                format!("'{}' is not the name of a resource type.", raw_type),
            )
        })?;

        // Phase 2: required fields.
        let (Some(raw_match), Some(raw_pattern), Some(raw_relationship)) = (
            self.match_attribute.as_deref(),
            self.pattern.as_deref(),
            self.relationship.as_deref(),
        ) else {
            let missing = [
                ("match", self.match_attribute.is_none()),
                ("pattern", self.pattern.is_none()),
                ("relationship", self.relationship.is_none()),
            ]
            .into_iter()
            .find(|(_, absent)| *absent)
            .map(|(name, _)| name)
            .unwrap_or("match");
            return Err(Error::validation(
                &anchor,
                format!("Required parameter missing: {}", missing),
            ));
        };

        // Phase 3: relationship kind.
        let relationship =
            Relationship::parse(&normalize_identifier(raw_relationship)).ok_or_else(|| {
                Error::validation(
                    &anchor,
                    format!("'{}' is not a valid relationship", raw_relationship),
                )
            })?;

        // Phase 4: match attribute.
        let match_attribute = normalize_identifier(raw_match);
        if !match_attribute.is_title() && !schema.has_attribute(&match_attribute) {
            return Err(Error::validation(
                &anchor,
                format!(
                    "The {} type does not have a param of '{}'",
                    target_type, match_attribute
                ),
            ));
        }

        let pattern = parse_pattern(raw_pattern)?;

        let invert = match &self.invert {
            None => false,
            Some(v) => v.to_bool().ok_or_else(|| {
                Error::validation(
                    &anchor,
                    format!("Invalid value {:?} for invert; expected true or false", v),
                )
            })?,
        };

        Ok(RuleSpec {
            anchor,
            target_type,
            match_attribute,
            pattern,
            invert,
            relationship,
        })
    }
}

impl RuleSpec {
    pub fn anchor(&self) -> &ResourceRef {
        &self.anchor
    }

    pub fn target_type(&self) -> &Ident {
        &self.target_type
    }

    pub fn match_attribute(&self) -> &Ident {
        &self.match_attribute
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn invert(&self) -> bool {
        self.invert
    }

    pub fn relationship(&self) -> Relationship {
        self.relationship
    }
}
