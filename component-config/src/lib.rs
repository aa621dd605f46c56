//! Component catalog loading.
//!
//! A catalog is a JSON document declaring component classes, the class and
//! factory registries that expose them, and an optional rendering policy.
//! [`Catalog`] resolves it into the structures `component_schema` consumes.

#![warn(missing_docs, clippy::pedantic)]

mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{Catalog, load_catalog};
pub use schema::{CatalogDocument, ClassSpec, FieldSpec};
