//! Tool factory registry.
//!
//! Tool factories are functions that build a tool for the flow-builder. Each
//! one is registered with a key, the group it belongs to, and either declared
//! metadata or its own source text for static extraction.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::source::SourceToolExtractor;

/// Result alias for registry operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Family a tool factory belongs to.
///
/// Catalogs merge groups in declaration order; a key registered by a later
/// group replaces the earlier entry in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolGroup {
    /// Tools without model dependencies.
    Base,
    /// Tools that need a language model.
    Llm,
    /// Model-backed tools that take extra parameters.
    ExtraLlm,
    /// Tools that take extra, optional parameters.
    ExtraOptional,
}

impl fmt::Display for ToolGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Base => "base",
            Self::Llm => "llm",
            Self::ExtraLlm => "extra_llm",
            Self::ExtraOptional => "extra_optional",
        })
    }
}

/// Name and description advertised by a tool.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl ToolParams {
    /// Creates params carrying both a name and a description.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
        }
    }

    /// Creates params from whichever values were found.
    #[must_use]
    pub fn partial(name: Option<String>, description: Option<String>) -> Self {
        Self { name, description }
    }

    /// The tool name, if known.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The tool description, if known.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Metadata declared alongside a tool factory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeclaredTool {
    name: &'static str,
    description: &'static str,
}

impl DeclaredTool {
    /// Declared tool name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared tool description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }
}

/// A registered tool factory.
///
/// Built in `const` context so that `#[tool_factory]` can submit it to the
/// link-time registry.
#[derive(Clone, Copy, Debug)]
pub struct ToolFactory {
    key: &'static str,
    group: ToolGroup,
    declared: Option<DeclaredTool>,
    source: Option<&'static str>,
}

inventory::collect!(ToolFactory);

impl ToolFactory {
    /// Creates a factory entry without metadata or source.
    #[must_use]
    pub const fn new(key: &'static str, group: ToolGroup) -> Self {
        Self {
            key,
            group,
            declared: None,
            source: None,
        }
    }

    /// Attaches declared metadata.
    #[must_use]
    pub const fn with_declared(self, name: &'static str, description: &'static str) -> Self {
        Self {
            declared: Some(DeclaredTool { name, description }),
            ..self
        }
    }

    /// Attaches the factory's source text.
    #[must_use]
    pub const fn with_source(self, source: &'static str) -> Self {
        Self {
            source: Some(source),
            ..self
        }
    }

    /// Registry key.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Group the factory belongs to.
    #[must_use]
    pub const fn group(&self) -> ToolGroup {
        self.group
    }

    /// Declared metadata, if any.
    #[must_use]
    pub const fn declared(&self) -> Option<DeclaredTool> {
        self.declared
    }

    /// Source text, if captured.
    #[must_use]
    pub const fn source(&self) -> Option<&'static str> {
        self.source
    }

    /// Resolves the tool's name and description.
    ///
    /// Declared metadata wins; otherwise the captured source is parsed with
    /// `extractor`. Returns `None` when neither yields a result.
    #[must_use]
    pub fn params(&self, extractor: &SourceToolExtractor) -> Option<ToolParams> {
        if let Some(declared) = self.declared {
            return Some(ToolParams::new(declared.name, declared.description));
        }
        let source = self.source?;
        extractor.extract(source)
    }

    fn validate(&self) -> ToolResult<()> {
        if self.key.trim().is_empty() {
            return Err(ToolError::InvalidDeclaration {
                reason: "tool key cannot be empty".into(),
            });
        }
        if let Some(declared) = self.declared
            && declared.name.trim().is_empty()
        {
            return Err(ToolError::InvalidDeclaration {
                reason: format!("tool `{}` declares an empty name", self.key),
            });
        }
        Ok(())
    }
}

/// Merged view over tool factories, keyed by registry key.
#[derive(Clone, Debug, Default)]
pub struct ToolCatalog {
    tools: IndexMap<&'static str, ToolFactory>,
}

impl ToolCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges factories group by group, keeping registration order within a
    /// group.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidDeclaration`] for an empty key or an empty
    /// declared name.
    pub fn from_factories<I>(factories: I) -> ToolResult<Self>
    where
        I: IntoIterator<Item = ToolFactory>,
    {
        let mut factories: Vec<ToolFactory> = factories.into_iter().collect();
        factories.sort_by_key(ToolFactory::group);

        let mut tools = IndexMap::new();
        for factory in factories {
            factory.validate()?;
            if let Some(previous) = tools.insert(factory.key, factory) {
                debug!(
                    key = factory.key,
                    replaced = %previous.group,
                    by = %factory.group,
                    "tool factory overridden"
                );
            }
        }

        Ok(Self { tools })
    }

    /// Builds a catalog from every factory submitted with `#[tool_factory]`.
    ///
    /// Link order is not stable, so entries inside a group are ordered by key.
    ///
    /// # Errors
    ///
    /// Same as [`ToolCatalog::from_factories`].
    pub fn discovered() -> ToolResult<Self> {
        let mut factories: Vec<ToolFactory> = inventory::iter::<ToolFactory>
            .into_iter()
            .copied()
            .collect();
        factories.sort_by_key(|factory| factory.key);
        Self::from_factories(factories)
    }

    /// Looks up a factory by key.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::UnknownTool`] when the key is not registered.
    pub fn get(&self, key: &str) -> ToolResult<&ToolFactory> {
        self.tools.get(key).ok_or_else(|| ToolError::UnknownTool {
            name: key.to_owned(),
        })
    }

    /// Resolves the name and description of the tool registered under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::UnknownTool`] when the key is not registered.
    pub fn tool_params(
        &self,
        key: &str,
        extractor: &SourceToolExtractor,
    ) -> ToolResult<Option<ToolParams>> {
        Ok(self.get(key)?.params(extractor))
    }

    /// Resolves the params of every registered tool, in catalog order.
    #[must_use]
    pub fn describe(
        &self,
        extractor: &SourceToolExtractor,
    ) -> IndexMap<String, Option<ToolParams>> {
        self.tools
            .iter()
            .map(|(key, factory)| ((*key).to_owned(), factory.params(extractor)))
            .collect()
    }

    /// Registered keys in catalog order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.keys().copied()
    }

    /// Registered factories in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolFactory> {
        self.tools.values()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Errors produced by tool registration and lookup.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool factory declaration failed validation.
    #[error("invalid tool declaration: {reason}")]
    InvalidDeclaration {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Requested tool does not exist.
    #[error("tool `{name}` is not registered")]
    UnknownTool {
        /// Name of the missing tool.
        name: String,
    },

    /// A constructor invoked during extraction failed.
    #[error("tool construction failed: {reason}")]
    Execution {
        /// Human-readable error returned by the constructor.
        reason: String,
    },
}

impl ToolError {
    /// Creates an execution error from the supplied reason.
    #[must_use]
    pub fn execution(reason: impl Into<String>) -> Self {
        Self::Execution {
            reason: reason.into(),
        }
    }
}
