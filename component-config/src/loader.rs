//! Catalog resolution and file loading.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use component_primitives::{ComponentClass, FieldDescriptor};
use component_schema::{DeclaredFactory, ModuleLoader, SchemaBuilder, TemplatePolicy};
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{CatalogDocument, ClassSpec, FieldSpec};

/// A resolved component catalog.
#[derive(Clone, Debug)]
pub struct Catalog {
    policy: TemplatePolicy,
    classes: IndexMap<String, Arc<ComponentClass>>,
    class_registry: IndexMap<String, Arc<ComponentClass>>,
    factory_registry: IndexMap<String, DeclaredFactory>,
}

impl Catalog {
    /// Parses and resolves a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any error of
    /// [`Catalog::from_document`].
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Resolves a parsed catalog document.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy is invalid, class names repeat, a name
    /// is unknown, inheritance is cyclic, or a declaration fails validation.
    pub fn from_document(document: CatalogDocument) -> ConfigResult<Self> {
        let policy = document.policy.unwrap_or_default();
        policy.validate()?;

        let mut specs = IndexMap::with_capacity(document.classes.len());
        for spec in &document.classes {
            if specs.insert(spec.name.as_str(), spec).is_some() {
                return Err(ConfigError::DuplicateClass {
                    name: spec.name.clone(),
                });
            }
        }

        let mut resolver = ClassResolver {
            specs,
            built: HashMap::new(),
            visiting: HashSet::new(),
        };
        let mut classes = IndexMap::with_capacity(document.classes.len());
        for spec in &document.classes {
            let class = resolver.resolve(&spec.name, &spec.name)?;
            classes.insert(spec.name.clone(), class);
        }

        let lookup = |key: &str, name: &str| {
            classes
                .get(name)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownClass {
                    name: name.to_owned(),
                    referenced_by: key.to_owned(),
                })
        };

        let mut class_registry = IndexMap::with_capacity(document.registry.len());
        for (key, name) in &document.registry {
            class_registry.insert(key.clone(), lookup(key.as_str(), name.as_str())?);
        }
        let mut factory_registry = IndexMap::with_capacity(document.factories.len());
        for (key, name) in &document.factories {
            let class = lookup(key.as_str(), name.as_str())?;
            factory_registry.insert(key.clone(), DeclaredFactory::new(key.clone(), class));
        }

        info!(
            classes = classes.len(),
            registered = class_registry.len(),
            factories = factory_registry.len(),
            "loaded component catalog"
        );

        Ok(Self {
            policy,
            classes,
            class_registry,
            factory_registry,
        })
    }

    /// Rendering policy declared by the catalog.
    #[must_use]
    pub fn policy(&self) -> &TemplatePolicy {
        &self.policy
    }

    /// Every declared class, by name, in declaration order.
    #[must_use]
    pub fn classes(&self) -> &IndexMap<String, Arc<ComponentClass>> {
        &self.classes
    }

    /// Looks up a declared class by name.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&Arc<ComponentClass>> {
        self.classes.get(name)
    }

    /// Class registry, keyed by component type.
    #[must_use]
    pub fn class_registry(&self) -> &IndexMap<String, Arc<ComponentClass>> {
        &self.class_registry
    }

    /// Factory registry, keyed by component type.
    #[must_use]
    pub fn factory_registry(&self) -> &IndexMap<String, DeclaredFactory> {
        &self.factory_registry
    }

    /// Creates a [`SchemaBuilder`] using this catalog's policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Schema`] if the policy is rejected.
    pub fn schema_builder(&self, loader: Arc<dyn ModuleLoader>) -> ConfigResult<SchemaBuilder> {
        Ok(SchemaBuilder::new(loader).with_policy(self.policy.clone())?)
    }
}

/// Reads and resolves the catalog at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
/// errors of [`Catalog::from_json_str`].
pub fn load_catalog(path: impl AsRef<Path>) -> ConfigResult<Catalog> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading component catalog");
    let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Catalog::from_json_str(&json)
}

struct ClassResolver<'d> {
    specs: IndexMap<&'d str, &'d ClassSpec>,
    built: HashMap<&'d str, Arc<ComponentClass>>,
    visiting: HashSet<&'d str>,
}

impl<'d> ClassResolver<'d> {
    fn resolve(&mut self, name: &'d str, referenced_by: &str) -> ConfigResult<Arc<ComponentClass>> {
        if let Some(class) = self.built.get(name) {
            return Ok(Arc::clone(class));
        }

        let spec: &'d ClassSpec = self.specs.get(name).copied().ok_or_else(|| {
            ConfigError::UnknownClass {
                name: name.to_owned(),
                referenced_by: referenced_by.to_owned(),
            }
        })?;
        if !self.visiting.insert(name) {
            return Err(ConfigError::InheritanceCycle {
                name: name.to_owned(),
            });
        }

        let declaration = |source: component_primitives::Error| ConfigError::Declaration {
            class: spec.name.clone(),
            source,
        };

        let mut builder = ComponentClass::builder(&spec.name, &spec.module);
        if let Some(doc) = &spec.doc {
            builder = builder.doc(doc.as_str());
        }
        for base in &spec.bases {
            builder = builder.base(self.resolve(base, &spec.name)?);
        }
        for field in &spec.fields {
            let descriptor = build_field(field).map_err(declaration)?;
            builder = builder.field(descriptor).map_err(declaration)?;
        }
        let class = Arc::new(builder.build().map_err(declaration)?);

        self.visiting.remove(name);
        self.built.insert(name, Arc::clone(&class));
        Ok(class)
    }
}

fn build_field(spec: &FieldSpec) -> component_primitives::Result<FieldDescriptor> {
    let mut builder = FieldDescriptor::builder(&spec.name, &spec.type_name).required(spec.required);
    if let Some(default) = &spec.default {
        builder = builder.default_value(default.clone());
    }
    if let Some(factory) = &spec.default_factory {
        builder = builder.default_factory(factory.clone());
    }
    for (key, value) in &spec.attributes {
        builder = builder.attribute(key.as_str(), value.clone())?;
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog(value: &serde_json::Value) -> ConfigResult<Catalog> {
        Catalog::from_json_str(&value.to_string())
    }

    #[test]
    fn resolves_bases_declared_later() {
        let catalog = catalog(&json!({
            "classes": [
                {
                    "name": "LLMChain",
                    "module": "langchain.chains.llm",
                    "bases": ["Chain"],
                    "fields": [
                        { "name": "prompt", "type": "BasePromptTemplate", "required": true },
                    ],
                },
                {
                    "name": "Chain",
                    "module": "langchain.chains.base",
                    "fields": [{ "name": "verbose", "type": "bool", "default": false }],
                },
            ],
            "registry": { "llm_chain": "LLMChain" },
            "factories": { "load_chain": "Chain" },
        }))
        .unwrap();

        let llm_chain = catalog.class("LLMChain").unwrap();
        assert_eq!(llm_chain.bases()[0].name(), "Chain");
        let fields: Vec<_> = llm_chain.fields().map(FieldDescriptor::name).collect();
        assert_eq!(fields, ["verbose", "prompt"]);

        let keys: Vec<_> = catalog.classes().keys().map(String::as_str).collect();
        assert_eq!(keys, ["LLMChain", "Chain"]);
        assert!(Arc::ptr_eq(
            &catalog.class_registry()["llm_chain"],
            llm_chain
        ));
        assert_eq!(catalog.factory_registry()["load_chain"].ident(), "load_chain");
    }

    #[test]
    fn detects_inheritance_cycles() {
        let err = catalog(&json!({
            "classes": [
                { "name": "A", "module": "m", "bases": ["B"] },
                { "name": "B", "module": "m", "bases": ["A"] },
            ],
        }))
        .expect_err("cycle");
        assert!(matches!(err, ConfigError::InheritanceCycle { name } if name == "A"));
    }

    #[test]
    fn reports_unknown_classes() {
        let err = catalog(&json!({
            "classes": [{ "name": "A", "module": "m", "bases": ["Missing"] }],
        }))
        .expect_err("unknown base");
        assert!(matches!(
            err,
            ConfigError::UnknownClass { name, referenced_by }
                if name == "Missing" && referenced_by == "A"
        ));

        let err = catalog(&json!({ "registry": { "llm_chain": "LLMChain" } }))
            .expect_err("unknown entry");
        assert!(matches!(
            err,
            ConfigError::UnknownClass { referenced_by, .. } if referenced_by == "llm_chain"
        ));
    }

    #[test]
    fn rejects_duplicate_classes() {
        let err = catalog(&json!({
            "classes": [
                { "name": "A", "module": "m" },
                { "name": "A", "module": "n" },
            ],
        }))
        .expect_err("duplicate");
        assert!(matches!(err, ConfigError::DuplicateClass { name } if name == "A"));
    }

    #[test]
    fn rejects_invalid_declarations() {
        let err = catalog(&json!({
            "classes": [{
                "name": "A",
                "module": "m",
                "fields": [{
                    "name": "x",
                    "type": "str",
                    "default": "a",
                    "default_factory": { "function": "f" },
                }],
            }],
        }))
        .expect_err("default and factory");
        assert!(matches!(err, ConfigError::Declaration { class, .. } if class == "A"));
    }

    #[test]
    fn rejects_component_type_key_as_field_name() {
        let err = catalog(&json!({
            "classes": [{
                "name": "A",
                "module": "m",
                "fields": [{ "name": "_type", "type": "str" }],
            }],
        }))
        .expect_err("reserved field name");
        assert!(matches!(err, ConfigError::Declaration { class, .. } if class == "A"));
    }

    #[test]
    fn rejects_invalid_policy() {
        let err = catalog(&json!({ "policy": { "infrastructure_markers": [""] } }))
            .expect_err("empty marker");
        assert!(matches!(err, ConfigError::Schema(_)));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = Catalog::from_json_str("{ classes").expect_err("json");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut path = std::env::temp_dir();
        path.push(format!("component-catalog-missing-{}.json", std::process::id()));
        let err = load_catalog(&path).expect_err("missing file");
        assert!(matches!(err, ConfigError::Io { path: reported, .. } if reported == path));
    }
}
