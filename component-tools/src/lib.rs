//! Tool factory registration and metadata discovery.
//!
//! Tool factories are registered with [`tool_factory`] (or built by hand as
//! [`ToolFactory`] values) and merged into a [`ToolCatalog`]. A factory's
//! advertised name and description come from declared metadata when present,
//! and otherwise from static inspection of its source by
//! [`SourceToolExtractor`].

#![warn(missing_docs, clippy::pedantic)]

mod constructors;
mod literal;
pub mod registry;
pub mod source;

pub use component_tools_macros::tool_factory;
pub use constructors::{ConstructorTable, DescribedTool};
#[doc(hidden)]
pub use inventory;
pub use registry::{
    DeclaredTool, ToolCatalog, ToolError, ToolFactory, ToolGroup, ToolParams, ToolResult,
};
pub use source::{SourceToolExtractor, ToolSourceError, ToolSourceResult};
