//! Match patterns: literal strings or `/.../` regular expressions.

use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;

#[derive(Debug, Clone)]
pub enum Pattern {
    Literal(String),
    Regex(Regex),
}

/// Parse a raw pattern value.
///
/// A value that starts and ends with `/` (and is at least two characters long)
/// has its delimiters stripped and the interior compiled as a regex. Anything
/// else, including a lone `"/"`, is a literal.
pub fn parse_pattern(raw: &str) -> Result<Pattern> {
    if raw.len() >= 2 && raw.starts_with('/') && raw.ends_with('/') {
        let inner = &raw[1..raw.len() - 1];
        let re = Regex::new(inner).map_err(|source| Error::InvalidPattern {
            pattern: raw.to_string(),
            source,
        })?;
        return Ok(Pattern::Regex(re));
    }
    Ok(Pattern::Literal(raw.to_string()))
}

impl Pattern {
    /// Literal: exact membership in `values`. Regex: any element matches.
    pub fn found(&self, values: &[&str]) -> bool {
        match self {
            Pattern::Literal(p) => values.iter().any(|v| *v == p.as_str()),
            Pattern::Regex(re) => values.iter().any(|v| re.is_match(v)),
        }
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, Pattern::Regex(_))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Literal(p) => f.write_str(p),
            Pattern::Regex(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}
