//! Component template extraction.
//!
//! Given a component name and a registry of classes (or of factories
//! declaring the class they return), [`SchemaBuilder`] produces the form
//! description the flow-builder renders: normalised fields, the class
//! description and its domain ancestry.
//!
//! ```
//! use component_primitives::{ComponentClass, FieldDescriptor};
//! use component_schema::SchemaBuilder;
//! use indexmap::IndexMap;
//! use std::sync::Arc;
//!
//! let prompt = FieldDescriptor::builder("template", "str")
//!     .required(true)
//!     .build()
//!     .unwrap();
//! let class = ComponentClass::builder("PromptTemplate", "langchain.prompts.prompt")
//!     .doc(
//!         "Schema to represent a prompt for an LLM.\n\n\
//!          Attributes:\n    template: The prompt template.",
//!     )
//!     .field(prompt)
//!     .and_then(|b| b.build())
//!     .unwrap();
//!
//! let mut registry = IndexMap::new();
//! registry.insert("prompt".to_owned(), Arc::new(class));
//!
//! let signature = SchemaBuilder::default()
//!     .build_from_registered_class("PromptTemplate", &registry)
//!     .unwrap();
//! let field = signature.template().field("template").unwrap();
//! assert!(field.show && field.multiline);
//! assert_eq!(field.placeholder, "The prompt template.");
//! ```

#![warn(missing_docs, clippy::pedantic)]

pub mod bases;
pub mod builder;
pub mod defaults;
pub mod docstring;
mod error;
pub mod normalize;
pub mod policy;
pub mod template;

pub use bases::BaseClassResolver;
pub use builder::{ComponentFactory, DeclaredFactory, SchemaBuilder};
pub use defaults::{
    DefaultFactory, DefaultFactoryError, DefaultFactoryResolver, DefaultResult, ModuleExports,
    ModuleLoader, ModuleRegistry,
};
pub use docstring::{ClassDoc, DocSection};
pub use error::{SchemaError, SchemaResult};
pub use normalize::{FieldNormalizer, FieldRecord, NormalizedField};
pub use policy::TemplatePolicy;
pub use template::{ComponentSignature, ComponentTemplate};
