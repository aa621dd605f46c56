//! Shared error definitions for component descriptors.

use thiserror::Error;

/// Result alias used by the descriptor builders.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while declaring component classes and fields.
#[derive(Debug, Error)]
pub enum Error {
    /// Field descriptor failed validation.
    #[error("invalid field `{field}`: {reason}")]
    InvalidField {
        /// Name of the offending field (may be empty).
        field: String,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Class definition failed validation.
    #[error("invalid component class: {reason}")]
    InvalidClass {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// A class declared the same field twice.
    #[error("class `{class}` declares field `{field}` more than once")]
    DuplicateField {
        /// Name of the class being built.
        class: String,
        /// Name of the repeated field.
        field: String,
    },
}

impl Error {
    pub(crate) fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
