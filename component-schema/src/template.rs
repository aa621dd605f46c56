//! Template structures returned to callers.

use indexmap::IndexMap;
use serde::Serialize;

use crate::normalize::NormalizedField;

/// Rendered form for one component type.
///
/// Serialises as a single map: `_type` first, then every field in
/// declaration order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComponentTemplate {
    #[serde(rename = "_type")]
    component_type: String,
    #[serde(flatten)]
    fields: IndexMap<String, NormalizedField>,
}

impl ComponentTemplate {
    /// Creates a template for the registry key `component_type`.
    #[must_use]
    pub fn new(
        component_type: impl Into<String>,
        fields: IndexMap<String, NormalizedField>,
    ) -> Self {
        Self {
            component_type: component_type.into(),
            fields,
        }
    }

    /// Registry key the template was built for.
    #[must_use]
    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    /// Rendered fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &IndexMap<String, NormalizedField> {
        &self.fields
    }

    /// Looks up a rendered field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&NormalizedField> {
        self.fields.get(name)
    }
}

/// Template plus the component's description and domain ancestry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComponentSignature {
    template: ComponentTemplate,
    description: String,
    base_classes: Vec<String>,
}

impl ComponentSignature {
    /// Assembles a signature.
    #[must_use]
    pub fn new(
        template: ComponentTemplate,
        description: String,
        base_classes: Vec<String>,
    ) -> Self {
        Self {
            template,
            description,
            base_classes,
        }
    }

    /// The rendered template.
    #[must_use]
    pub fn template(&self) -> &ComponentTemplate {
        &self.template
    }

    /// Description section of the class docstring.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Domain ancestors, depth first.
    #[must_use]
    pub fn base_classes(&self) -> &[String] {
        &self.base_classes
    }
}
