//! References to functions that produce a field's default value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Points at the function that computes a field default.
///
/// `Named` is the structured form and should be preferred. `Printed` carries
/// the rendered representation of a function object (for example
/// `<function default_tools>`) as emitted by older component catalogs; the
/// bare function name is recovered from the text at resolution time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultFactoryRef {
    /// Structured reference to a function by module and name.
    Named {
        /// Module exporting the function. When absent, the module that
        /// resolves defaults for the owning class is used.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        module: Option<String>,
        /// Bare function name inside the module.
        function: String,
    },
    /// Printed function reference kept for catalog compatibility.
    Printed(String),
}

impl DefaultFactoryRef {
    /// Creates a structured reference resolved against the owning class's module.
    #[must_use]
    pub fn function(function: impl Into<String>) -> Self {
        Self::Named {
            module: None,
            function: function.into(),
        }
    }

    /// Creates a structured reference to a function in an explicit module.
    #[must_use]
    pub fn in_module(module: impl Into<String>, function: impl Into<String>) -> Self {
        Self::Named {
            module: Some(module.into()),
            function: function.into(),
        }
    }

    /// Creates a legacy printed reference.
    #[must_use]
    pub fn printed(text: impl Into<String>) -> Self {
        Self::Printed(text.into())
    }
}

impl fmt::Display for DefaultFactoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named {
                module: Some(module),
                function,
            } => write!(f, "{module}.{function}"),
            Self::Named {
                module: None,
                function,
            } => f.write_str(function),
            Self::Printed(text) => f.write_str(text),
        }
    }
}
