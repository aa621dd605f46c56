//! Descriptor contracts for component libraries.
//!
//! A component library declares its classes here once, at definition time:
//! each class names its module, docstring, ancestors and the ordered field
//! descriptors the template builder renders.

#![warn(missing_docs, clippy::pedantic)]

mod class;
mod default_factory;
mod error;
mod field;

/// Component class definitions and their builder.
pub use class::{ComponentClass, ComponentClassBuilder};
/// References to default-producing functions.
pub use default_factory::DefaultFactoryRef;
/// Error type and result alias for descriptor validation.
pub use error::{Error, Result};
/// Field descriptors and their builder.
pub use field::{
    COMPONENT_TYPE_KEY, FieldDescriptor, FieldDescriptorBuilder, RESERVED_ATTRIBUTES,
};
