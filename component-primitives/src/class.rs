//! Component class definitions exposed by the component library.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::field::FieldDescriptor;

/// A component class: its documentation, fields and direct ancestors.
///
/// Classes are declared once through [`ComponentClass::builder`] and are
/// immutable afterwards. The field set includes the fields inherited from the
/// direct ancestors, see [`ComponentClassBuilder::build`].
#[derive(Clone, Debug)]
pub struct ComponentClass {
    name: String,
    module: String,
    doc: Option<String>,
    fields: IndexMap<String, FieldDescriptor>,
    bases: Vec<Arc<ComponentClass>>,
}

impl ComponentClass {
    /// Starts building a class defined in the given module path.
    #[must_use]
    pub fn builder(name: impl Into<String>, module: impl Into<String>) -> ComponentClassBuilder {
        ComponentClassBuilder {
            name: name.into(),
            module: module.into(),
            doc: None,
            fields: IndexMap::new(),
            bases: Vec::new(),
        }
    }

    /// Class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted path of the module defining the class.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Raw docstring, if the class has one.
    #[must_use]
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Ordered field descriptors, inherited fields included.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    /// Number of fields, inherited fields included.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Direct ancestors in declaration order.
    #[must_use]
    pub fn bases(&self) -> &[Arc<ComponentClass>] {
        &self.bases
    }

    /// Module used to resolve default factories declared on this class.
    ///
    /// This is the module of the first direct ancestor, falling back to the
    /// class's own module for classes without ancestors.
    #[must_use]
    pub fn default_factory_module(&self) -> &str {
        self.bases
            .first()
            .map_or(self.module.as_str(), |base| base.module())
    }
}

impl AsRef<ComponentClass> for ComponentClass {
    fn as_ref(&self) -> &ComponentClass {
        self
    }
}

/// Builder for [`ComponentClass`].
#[derive(Debug)]
pub struct ComponentClassBuilder {
    name: String,
    module: String,
    doc: Option<String>,
    fields: IndexMap<String, FieldDescriptor>,
    bases: Vec<Arc<ComponentClass>>,
}

impl ComponentClassBuilder {
    /// Sets the docstring.
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Appends a direct ancestor.
    #[must_use]
    pub fn base(mut self, base: Arc<ComponentClass>) -> Self {
        self.bases.push(base);
        self
    }

    /// Declares a field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateField`] if the class already declares a field
    /// with the same name.
    pub fn field(mut self, field: FieldDescriptor) -> Result<Self> {
        if self.fields.contains_key(field.name()) {
            return Err(Error::DuplicateField {
                class: self.name,
                field: field.name().to_owned(),
            });
        }
        self.fields.insert(field.name().to_owned(), field);
        Ok(self)
    }

    /// Consumes the builder and returns the class.
    ///
    /// Inherited fields come first, in ancestor order, followed by the fields
    /// declared on this class. A declared field that shadows an inherited one
    /// replaces it at the inherited position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidClass`] when the name or module is empty.
    pub fn build(self) -> Result<ComponentClass> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidClass {
                reason: "class name cannot be empty".into(),
            });
        }
        if self.module.trim().is_empty() {
            return Err(Error::InvalidClass {
                reason: format!("class `{}` must declare its module", self.name),
            });
        }

        let mut fields = IndexMap::new();
        for base in &self.bases {
            for field in base.fields() {
                fields.insert(field.name().to_owned(), field.clone());
            }
        }
        for (name, field) in self.fields {
            fields.insert(name, field);
        }

        Ok(ComponentClass {
            name: self.name,
            module: self.module,
            doc: self.doc,
            fields,
            bases: self.bases,
        })
    }
}
