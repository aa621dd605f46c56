use std::path::PathBuf;

use component_schema::SchemaError;
use thiserror::Error;

/// Result alias for catalog loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading a component catalog.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The catalog file could not be read.
    #[error("failed to read catalog {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Source [`std::io::Error`].
        source: std::io::Error,
    },

    /// The catalog is not valid JSON or does not match the document shape.
    #[error("invalid catalog document: {source}")]
    Parse {
        /// Source [`serde_json::Error`].
        #[from]
        source: serde_json::Error,
    },

    /// Two classes share a name.
    #[error("class `{name}` is declared more than once")]
    DuplicateClass {
        /// Duplicated class name.
        name: String,
    },

    /// A registry entry or base list names an undeclared class.
    #[error("`{referenced_by}` refers to unknown class `{name}`")]
    UnknownClass {
        /// Missing class name.
        name: String,
        /// Registry key or class that referenced it.
        referenced_by: String,
    },

    /// A class inherits from itself, directly or indirectly.
    #[error("class `{name}` inherits from itself")]
    InheritanceCycle {
        /// Class at which the cycle was detected.
        name: String,
    },

    /// A class or field declaration failed validation.
    #[error("invalid declaration in class `{class}`: {source}")]
    Declaration {
        /// Class being built.
        class: String,
        /// Source validation error.
        source: component_primitives::Error,
    },

    /// The policy override was rejected.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
