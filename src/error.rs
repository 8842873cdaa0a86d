//! Error types for globe construction and configuration.

use std::fmt;

/// Errors raised while loading globe data or configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum GlobeError {
    /// The document could not be parsed (invalid JSON or wrong top-level shape).
    Parse(String),
    /// A single geographic feature could not be turned into rings.
    MalformedFeature {
        /// Position of the feature within its collection.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },
    /// The configuration or location list is invalid.
    Config(String),
}

impl GlobeError {
    pub(crate) fn malformed(index: usize, reason: impl Into<String>) -> Self {
        GlobeError::MalformedFeature {
            index,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GlobeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlobeError::Parse(msg) => write!(f, "Parse error: {}", msg),
            GlobeError::MalformedFeature { index, reason } => {
                write!(f, "Malformed feature #{}: {}", index, reason)
            }
            GlobeError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for GlobeError {}

impl From<serde_json::Error> for GlobeError {
    fn from(err: serde_json::Error) -> Self {
        GlobeError::Parse(err.to_string())
    }
}
