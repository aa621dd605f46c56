//! Component template extraction for visual flow builders.
//!
//! This crate bundles the workspace crates behind feature flags so
//! downstream users can enable only the pieces they need.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use component_primitives as primitives;

/// Template building (enabled by `schema` feature).
#[cfg(feature = "schema")]
pub use component_schema as schema;

/// Tool factory registry and metadata extraction (enabled by `tools` feature).
#[cfg(feature = "tools")]
pub use component_tools as tools;

/// Catalog loading (enabled by `config` feature).
#[cfg(feature = "config")]
pub use component_config as config;

/// Tracing setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use component_telemetry as telemetry;
