//! Error kinds raised while building and applying manifold rules.

use crate::spec::Ident;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or incomplete rule declaration.
    #[error("{anchor}: {message}")]
    Validation { anchor: String, message: String },

    /// A `/.../` pattern whose interior is not a valid regular expression.
    #[error("invalid pattern {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("'{0}' is not the name of a resource type")]
    UnknownType(Ident),

    #[error("cannot add relationships without a catalog")]
    MissingCatalog,
}

impl Error {
    pub(crate) fn validation(anchor: impl ToString, message: impl Into<String>) -> Self {
        Error::Validation {
            anchor: anchor.to_string(),
            message: message.into(),
        }
    }
}
