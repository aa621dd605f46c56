//! Error types for template construction.

use thiserror::Error;

/// Errors that abort building a component template.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// No registry entry resolves to the requested component.
    #[error("component `{name}` not found")]
    NotFound {
        /// Requested component (class) name.
        name: String,
    },

    /// A keyed docstring section contains a line without a `:` separator.
    #[error("malformed docstring: `{line}` in section {section} has no `:` separator")]
    MalformedDoc {
        /// Section the line belongs to.
        section: &'static str,
        /// The offending line, trimmed.
        line: String,
    },

    /// Template policy failed validation.
    #[error("invalid template policy: {reason}")]
    InvalidPolicy {
        /// Human-readable reason for rejection.
        reason: String,
    },
}

impl SchemaError {
    /// Convenience helper to construct not-found errors.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }
}

/// Result alias for template construction.
pub type SchemaResult<T> = Result<T, SchemaError>;
