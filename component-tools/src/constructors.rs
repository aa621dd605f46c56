//! Registered constructors used when a factory returns something other than
//! a `Tool`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::registry::{ToolError, ToolResult};

/// A constructed tool exposing its advertised metadata.
pub trait DescribedTool {
    /// Tool name.
    fn name(&self) -> &str;

    /// Tool description.
    fn description(&self) -> &str;
}

type Constructor = dyn Fn(&[Value]) -> ToolResult<Box<dyn DescribedTool>> + Send + Sync;

/// Table of constructors keyed by the call path used in source
/// (for example `RequestsGetTool::new`).
///
/// Only paths registered here are ever invoked during extraction.
#[derive(Clone, Default)]
pub struct ConstructorTable {
    constructors: HashMap<String, Arc<Constructor>>,
}

impl fmt::Debug for ConstructorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut paths: Vec<_> = self.constructors.keys().collect();
        paths.sort();
        f.debug_struct("ConstructorTable")
            .field("paths", &paths)
            .finish()
    }
}

impl ConstructorTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constructor for `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidDeclaration`] if the path is empty or
    /// already registered.
    pub fn register<F, T>(&mut self, path: impl Into<String>, constructor: F) -> ToolResult<()>
    where
        F: Fn(&[Value]) -> ToolResult<T> + Send + Sync + 'static,
        T: DescribedTool + 'static,
    {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(ToolError::InvalidDeclaration {
                reason: "constructor path cannot be empty".into(),
            });
        }
        if self.constructors.contains_key(&path) {
            return Err(ToolError::InvalidDeclaration {
                reason: format!("constructor `{path}` is already registered"),
            });
        }

        let erased: Arc<Constructor> = Arc::new(move |args: &[Value]| {
            constructor(args).map(|tool| Box::new(tool) as Box<dyn DescribedTool>)
        });
        self.constructors.insert(path, erased);
        Ok(())
    }

    /// Builder-style variant of [`ConstructorTable::register`].
    ///
    /// # Errors
    ///
    /// Same as [`ConstructorTable::register`].
    pub fn with<F, T>(mut self, path: impl Into<String>, constructor: F) -> ToolResult<Self>
    where
        F: Fn(&[Value]) -> ToolResult<T> + Send + Sync + 'static,
        T: DescribedTool + 'static,
    {
        self.register(path, constructor)?;
        Ok(self)
    }

    /// Whether a constructor is registered for `path`.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.constructors.contains_key(path)
    }

    /// Invokes the constructor for `path`, or returns `None` if there is none.
    pub(crate) fn construct(
        &self,
        path: &str,
        args: &[Value],
    ) -> Option<ToolResult<Box<dyn DescribedTool>>> {
        self.constructors.get(path).map(|constructor| constructor(args))
    }

    /// Number of registered constructors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}
