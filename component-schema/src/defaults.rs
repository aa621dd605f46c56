//! Resolution of default factories to concrete default values.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use component_primitives::DefaultFactoryRef;
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

static PRINTED_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<function (?:[\w.]+\.)?(\w+)(?: at 0x[0-9a-fA-F]+)?>")
        .expect("invalid printed function regex")
});

/// Result alias for default resolution.
pub type DefaultResult<T> = Result<T, DefaultFactoryError>;

/// Reasons a default factory could not produce a value.
#[derive(Debug, Error)]
pub enum DefaultFactoryError {
    /// Printed reference does not look like a function object.
    #[error("unrecognised function reference `{text}`")]
    UnrecognizedReference {
        /// The printed text.
        text: String,
    },

    /// The module is not known to the loader.
    #[error("module `{module}` is not loaded")]
    UnknownModule {
        /// Requested module path.
        module: String,
    },

    /// The module does not export the function.
    #[error("module `{module}` has no function `{function}`")]
    UnknownFunction {
        /// Module that was searched.
        module: String,
        /// Missing function name.
        function: String,
    },

    /// The function ran and failed.
    #[error("default factory failed: {reason}")]
    Invocation {
        /// Human-readable error returned by the function.
        reason: String,
    },

    /// A module was registered twice.
    #[error("module `{module}` is already registered")]
    DuplicateModule {
        /// Module path.
        module: String,
    },
}

impl DefaultFactoryError {
    /// Creates an invocation error from the supplied reason.
    #[must_use]
    pub fn invocation(reason: impl Into<String>) -> Self {
        Self::Invocation {
            reason: reason.into(),
        }
    }
}

/// A zero-argument function producing a default value.
pub trait DefaultFactory: Send + Sync {
    /// Produces the default value.
    ///
    /// # Errors
    ///
    /// Implementations return [`DefaultFactoryError::Invocation`] on failure.
    fn produce(&self) -> DefaultResult<Value>;
}

impl<F> DefaultFactory for F
where
    F: Fn() -> DefaultResult<Value> + Send + Sync,
{
    fn produce(&self) -> DefaultResult<Value> {
        (self)()
    }
}

/// Functions exported by one module.
#[derive(Clone)]
pub struct ModuleExports {
    path: String,
    functions: IndexMap<String, Arc<dyn DefaultFactory>>,
}

impl fmt::Debug for ModuleExports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleExports")
            .field("path", &self.path)
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ModuleExports {
    /// Creates an empty export table for the module path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            functions: IndexMap::new(),
        }
    }

    /// Exports a fallible function under `name`.
    #[must_use]
    pub fn with_function<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn() -> DefaultResult<Value> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
        self
    }

    /// Exports an infallible function under `name`.
    #[must_use]
    pub fn with_value<F>(self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.with_function(name, move || Ok(function()))
    }

    /// Exports an existing factory object under `name`.
    #[must_use]
    pub fn with_factory(
        mut self,
        name: impl Into<String>,
        factory: Arc<dyn DefaultFactory>,
    ) -> Self {
        self.functions.insert(name.into(), factory);
        self
    }

    /// Module path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Looks up an exported function.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn DefaultFactory>> {
        self.functions.get(name)
    }
}

/// Loads modules by path.
pub trait ModuleLoader: Send + Sync {
    /// Returns the exports of the module at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DefaultFactoryError::UnknownModule`] when the module cannot be
    /// loaded.
    fn load(&self, path: &str) -> DefaultResult<&ModuleExports>;
}

/// In-memory module table.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, ModuleExports>,
}

impl ModuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module.
    ///
    /// # Errors
    ///
    /// Returns [`DefaultFactoryError::DuplicateModule`] if the path is already
    /// registered.
    pub fn register(&mut self, exports: ModuleExports) -> DefaultResult<()> {
        if self.modules.contains_key(exports.path()) {
            return Err(DefaultFactoryError::DuplicateModule {
                module: exports.path().to_owned(),
            });
        }
        self.modules.insert(exports.path().to_owned(), exports);
        Ok(())
    }
}

impl ModuleLoader for ModuleRegistry {
    fn load(&self, path: &str) -> DefaultResult<&ModuleExports> {
        self.modules
            .get(path)
            .ok_or_else(|| DefaultFactoryError::UnknownModule {
                module: path.to_owned(),
            })
    }
}

/// Extracts the bare function name from a printed function reference.
#[must_use]
pub fn printed_function_name(text: &str) -> Option<&str> {
    PRINTED_FUNCTION
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|name| name.as_str())
}

/// Turns [`DefaultFactoryRef`]s into concrete values.
#[derive(Clone, Copy)]
pub struct DefaultFactoryResolver<'a> {
    loader: &'a dyn ModuleLoader,
}

impl fmt::Debug for DefaultFactoryResolver<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultFactoryResolver").finish_non_exhaustive()
    }
}

impl<'a> DefaultFactoryResolver<'a> {
    /// Creates a resolver backed by the given loader.
    #[must_use]
    pub fn new(loader: &'a dyn ModuleLoader) -> Self {
        Self { loader }
    }

    /// Resolves `reference` and invokes the function it names.
    ///
    /// `module` is used for printed references and for structured references
    /// that do not name a module.
    ///
    /// # Errors
    ///
    /// Any [`DefaultFactoryError`]: unrecognised printed text, unknown module,
    /// unknown function or a failing invocation.
    pub fn resolve(&self, module: &str, reference: &DefaultFactoryRef) -> DefaultResult<Value> {
        let (module, function) = match reference {
            DefaultFactoryRef::Named {
                module: explicit,
                function,
            } => (explicit.as_deref().unwrap_or(module), function.as_str()),
            DefaultFactoryRef::Printed(text) => {
                let function = printed_function_name(text).ok_or_else(|| {
                    DefaultFactoryError::UnrecognizedReference { text: text.clone() }
                })?;
                (module, function)
            }
        };

        let exports = self.loader.load(module)?;
        let factory = exports
            .get(function)
            .ok_or_else(|| DefaultFactoryError::UnknownFunction {
                module: module.to_owned(),
                function: function.to_owned(),
            })?;
        factory.produce()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn registry() -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        registry
            .register(
                ModuleExports::new("langchain.agents")
                    .with_value("default_tools", || json!(["search", "calculator"]))
                    .with_function("broken", || {
                        Err(DefaultFactoryError::invocation("no api key"))
                    }),
            )
            .unwrap();
        registry
    }

    #[test]
    fn extracts_printed_names() {
        assert_eq!(printed_function_name("<function default_tools>"), Some("default_tools"));
        assert_eq!(
            printed_function_name("<function agents.default_tools at 0x7f3a2c>"),
            Some("default_tools")
        );
        assert_eq!(printed_function_name("default_tools"), None);
    }

    #[test]
    fn resolves_printed_reference() {
        let registry = registry();
        let resolver = DefaultFactoryResolver::new(&registry);
        let value = resolver
            .resolve(
                "langchain.agents",
                &DefaultFactoryRef::printed("<function default_tools>"),
            )
            .unwrap();
        assert_eq!(value, json!(["search", "calculator"]));
    }

    #[test]
    fn explicit_module_overrides_caller_module() {
        let registry = registry();
        let resolver = DefaultFactoryResolver::new(&registry);
        let value = resolver
            .resolve(
                "somewhere.else",
                &DefaultFactoryRef::in_module("langchain.agents", "default_tools"),
            )
            .unwrap();
        assert_eq!(value, json!(["search", "calculator"]));
    }

    #[test]
    fn failures_are_reported() {
        let registry = registry();
        let resolver = DefaultFactoryResolver::new(&registry);

        let err = resolver
            .resolve("langchain.agents", &DefaultFactoryRef::printed("lambda"))
            .expect_err("pattern");
        assert!(matches!(err, DefaultFactoryError::UnrecognizedReference { .. }));

        let err = resolver
            .resolve("missing", &DefaultFactoryRef::function("default_tools"))
            .expect_err("module");
        assert!(matches!(
            err,
            DefaultFactoryError::UnknownModule { module } if module == "missing"
        ));

        let err = resolver
            .resolve("langchain.agents", &DefaultFactoryRef::function("nope"))
            .expect_err("function");
        assert!(matches!(err, DefaultFactoryError::UnknownFunction { .. }));

        let err = resolver
            .resolve("langchain.agents", &DefaultFactoryRef::function("broken"))
            .expect_err("invocation");
        assert!(matches!(
            err,
            DefaultFactoryError::Invocation { reason } if reason == "no api key"
        ));
    }

    struct Constant(Value);

    impl DefaultFactory for Constant {
        fn produce(&self) -> DefaultResult<Value> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn resolves_factory_objects() {
        let mut registry = ModuleRegistry::new();
        registry
            .register(
                ModuleExports::new("langchain.llms")
                    .with_factory("default_temperature", Arc::new(Constant(json!(0.7)))),
            )
            .unwrap();

        let value = DefaultFactoryResolver::new(&registry)
            .resolve("langchain.llms", &DefaultFactoryRef::function("default_temperature"))
            .unwrap();
        assert_eq!(value, json!(0.7));
    }

    #[test]
    fn duplicate_module_rejected() {
        let mut registry = registry();
        let err = registry
            .register(ModuleExports::new("langchain.agents"))
            .expect_err("duplicate");
        assert!(matches!(err, DefaultFactoryError::DuplicateModule { .. }));
    }
}
