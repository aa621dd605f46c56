//! Template construction from registered components.

use std::fmt;
use std::sync::Arc;

use component_primitives::{ComponentClass, FieldDescriptor};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::bases::BaseClassResolver;
use crate::defaults::{DefaultFactoryResolver, ModuleLoader, ModuleRegistry};
use crate::docstring::ClassDoc;
use crate::error::{SchemaError, SchemaResult};
use crate::normalize::{FieldNormalizer, FieldRecord};
use crate::policy::{TemplatePolicy, contains};
use crate::template::{ComponentSignature, ComponentTemplate};

/// A registry entry that produces a component class.
pub trait ComponentFactory {
    /// The class the factory declares as its return type.
    fn return_type(&self) -> &ComponentClass;
}

impl<T> ComponentFactory for Arc<T>
where
    T: ComponentFactory + ?Sized,
{
    fn return_type(&self) -> &ComponentClass {
        (**self).return_type()
    }
}

/// Factory known by name together with the class it returns.
#[derive(Clone, Debug)]
pub struct DeclaredFactory {
    ident: String,
    returns: Arc<ComponentClass>,
}

impl DeclaredFactory {
    /// Declares that the factory `ident` returns `returns`.
    #[must_use]
    pub fn new(ident: impl Into<String>, returns: Arc<ComponentClass>) -> Self {
        Self {
            ident: ident.into(),
            returns,
        }
    }

    /// Factory identifier.
    #[must_use]
    pub fn ident(&self) -> &str {
        &self.ident
    }
}

impl ComponentFactory for DeclaredFactory {
    fn return_type(&self) -> &ComponentClass {
        &self.returns
    }
}

/// Builds [`ComponentSignature`]s for registered components.
pub struct SchemaBuilder {
    loader: Arc<dyn ModuleLoader>,
    policy: TemplatePolicy,
}

impl fmt::Debug for SchemaBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaBuilder")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new(Arc::new(ModuleRegistry::new()))
    }
}

impl SchemaBuilder {
    /// Creates a builder resolving default factories through `loader`.
    #[must_use]
    pub fn new(loader: Arc<dyn ModuleLoader>) -> Self {
        Self {
            loader,
            policy: TemplatePolicy::default(),
        }
    }

    /// Replaces the rendering policy.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidPolicy`] if the policy fails validation.
    pub fn with_policy(mut self, policy: TemplatePolicy) -> SchemaResult<Self> {
        policy.validate()?;
        self.policy = policy;
        Ok(self)
    }

    /// The active rendering policy.
    #[must_use]
    pub fn policy(&self) -> &TemplatePolicy {
        &self.policy
    }

    /// Builds the signature of the class returned by a registered factory.
    ///
    /// The first entry whose return class is named `name` wins; its key becomes
    /// the template's `_type`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NotFound`] when no factory returns a class named
    /// `name`, or [`SchemaError::MalformedDoc`] when the class docstring cannot
    /// be parsed.
    pub fn build_from_registered_factory<'r, I, K, F>(
        &self,
        name: &str,
        registry: I,
    ) -> SchemaResult<ComponentSignature>
    where
        I: IntoIterator<Item = (K, &'r F)>,
        K: AsRef<str>,
        F: ComponentFactory + ?Sized + 'r,
    {
        let (key, factory) = registry
            .into_iter()
            .find(|(_, factory)| factory.return_type().name() == name)
            .ok_or_else(|| SchemaError::not_found(name))?;

        self.build(
            key.as_ref(),
            factory.return_type(),
            &self.policy.factory_excluded_fields,
        )
    }

    /// Builds the signature of a registered class.
    ///
    /// The first entry whose class is named `name` wins; its key becomes the
    /// template's `_type`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NotFound`] when no class is named `name`, or
    /// [`SchemaError::MalformedDoc`] when the class docstring cannot be parsed.
    pub fn build_from_registered_class<'r, I, K, C>(
        &self,
        name: &str,
        registry: I,
    ) -> SchemaResult<ComponentSignature>
    where
        I: IntoIterator<Item = (K, &'r C)>,
        K: AsRef<str>,
        C: AsRef<ComponentClass> + ?Sized + 'r,
    {
        let (key, class) = registry
            .into_iter()
            .find(|(_, class)| <C as AsRef<ComponentClass>>::as_ref(class).name() == name)
            .ok_or_else(|| SchemaError::not_found(name))?;

        self.build(
            key.as_ref(),
            <C as AsRef<ComponentClass>>::as_ref(class),
            &self.policy.class_excluded_fields,
        )
    }

    fn build(
        &self,
        component_type: &str,
        class: &ComponentClass,
        excluded: &[String],
    ) -> SchemaResult<ComponentSignature> {
        let docs = ClassDoc::parse(class.doc().unwrap_or_default())?;

        let records: IndexMap<String, FieldRecord> = class
            .fields()
            .filter(|field| !contains(excluded, field.name()))
            .map(|field| {
                let record = FieldRecord {
                    type_name: field.type_name().to_owned(),
                    required: field.required(),
                    default: self.default_for(class, field),
                    placeholder: docs.placeholder(field.name()).to_owned(),
                    list: None,
                    attributes: field.attributes().clone(),
                };
                (field.name().to_owned(), record)
            })
            .collect();

        let fields = FieldNormalizer::new(&self.policy).normalize(records);
        let base_classes = BaseClassResolver::new(&self.policy).resolve(class);

        debug!(
            component = class.name(),
            component_type,
            fields = fields.len(),
            "built component template"
        );

        Ok(ComponentSignature::new(
            ComponentTemplate::new(component_type, fields),
            docs.description().to_owned(),
            base_classes,
        ))
    }

    fn default_for(&self, class: &ComponentClass, field: &FieldDescriptor) -> Option<Value> {
        let Some(reference) = field.default_factory() else {
            return field.default().cloned();
        };

        let resolver = DefaultFactoryResolver::new(self.loader.as_ref());
        match resolver.resolve(class.default_factory_module(), reference) {
            Ok(value) => Some(value),
            Err(err) => {
                debug!(
                    component = class.name(),
                    field = field.name(),
                    %reference,
                    ?err,
                    "default factory unresolved; omitting default"
                );
                None
            }
        }
    }
}
