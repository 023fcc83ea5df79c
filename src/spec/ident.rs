//! Identifier type used for type names, attribute names and relationships.
//!
//! Example: "Package" => Ident("package")
//!
//! Identifiers are lowercased on construction and derive ordering so they can be
//! used as BTreeMap/BTreeSet keys.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Ident(String);

impl Ident {
    /// Sentinel match attribute selecting a resource's identifying name.
    pub const TITLE: &'static str = "title";

    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_title(&self) -> bool {
        self.0 == Self::TITLE
    }
}

/// Lowercase `raw` into an identifier.
pub fn normalize_identifier(raw: &str) -> Ident {
    Ident::new(raw)
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Ident {
    fn from(raw: &str) -> Self {
        Ident::new(raw)
    }
}

impl<'de> Deserialize<'de> for Ident {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Ident::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_on_construction() {
        assert_eq!(normalize_identifier("Package").as_str(), "package");
        assert_eq!(Ident::new("NOTIFY"), Ident::from("notify"));
    }

    #[test]
    fn title_sentinel() {
        assert!(Ident::new("Title").is_title());
        assert!(!Ident::new("name").is_title());
    }

    #[test]
    fn deserializes_normalized() {
        let id: Ident = serde_json::from_str("\"YumRepo\"").unwrap();
        assert_eq!(id.as_str(), "yumrepo");
    }
}
