use crate::spec::Ident;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Attribute value: a single scalar or an ordered sequence of scalars.
///
/// Numbers and booleans are kept in their string form so matching always
/// compares text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    One(String),
    Many(Vec<String>),
}

/// Scalar as it appears in JSON input.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Str(String),
    Num(serde_json::Number),
    Bool(bool),
}

impl RawScalar {
    fn into_string(self) -> String {
        match self {
            RawScalar::Str(s) => s,
            RawScalar::Num(n) => n.to_string(),
            RawScalar::Bool(b) => b.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    One(RawScalar),
    Many(Vec<RawScalar>),
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawValue::deserialize(deserializer)? {
            RawValue::One(v) => Value::One(v.into_string()),
            RawValue::Many(vs) => Value::Many(vs.into_iter().map(RawScalar::into_string).collect()),
        })
    }
}

impl Value {
    /// Coerce to a sequence; a scalar becomes a one-element sequence.
    pub fn as_values(&self) -> Vec<&str> {
        match self {
            Value::One(v) => vec![v.as_str()],
            Value::Many(vs) => vs.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::One(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::One(v)
    }
}

impl From<Vec<&str>> for Value {
    fn from(vs: Vec<&str>) -> Self {
        Value::Many(vs.into_iter().map(str::to_string).collect())
    }
}

/// Reference to a resource by type and title, rendered as `Type[title]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceRef {
    pub type_name: Ident,
    pub title: String,
}

impl ResourceRef {
    pub fn new(type_name: impl AsRef<str>, title: impl Into<String>) -> Self {
        Self {
            type_name: Ident::new(type_name),
            title: title.into(),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // "yum::repo" => "Yum::Repo"
        let segments: Vec<String> = self
            .type_name
            .as_str()
            .split("::")
            .map(|seg| {
                let mut chars = seg.chars();
                match chars.next() {
                    Some(c) => c.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect();
        write!(f, "{}[{}]", segments.join("::"), self.title)
    }
}

impl FromStr for ResourceRef {
    type Err = String;

    /// Parse "Package[foo]" into ResourceRef { package, foo }.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let open = s
            .find('[')
            .ok_or_else(|| format!("resource reference must look like Type[title]: {}", s))?;
        if !s.ends_with(']') {
            return Err(format!("resource reference must end with ']': {}", s));
        }
        let type_name = s[..open].trim();
        let title = &s[open + 1..s.len() - 1];
        if type_name.is_empty() || title.is_empty() {
            return Err(format!("resource reference has an empty type or title: {}", s));
        }
        Ok(ResourceRef::new(type_name, title))
    }
}

impl Serialize for ResourceRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub type_name: Ident,
    pub title: String,
    pub attributes: BTreeMap<Ident, Value>,
}

impl Resource {
    pub fn new(type_name: impl AsRef<str>, title: impl Into<String>) -> Self {
        Self {
            type_name: Ident::new(type_name),
            title: title.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(Ident::new(name), value.into());
        self
    }

    pub fn reference(&self) -> ResourceRef {
        ResourceRef {
            type_name: self.type_name.clone(),
            title: self.title.clone(),
        }
    }

    pub fn attribute(&self, name: &Ident) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Identifying name: an explicit scalar `name` attribute wins over the title.
    pub fn name(&self) -> &str {
        match self.attributes.get(&Ident::new("name")) {
            Some(Value::One(n)) => n.as_str(),
            _ => self.title.as_str(),
        }
    }
}
