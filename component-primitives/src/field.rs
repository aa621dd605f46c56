//! Field descriptors registered by component classes.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::default_factory::DefaultFactoryRef;
use crate::error::{Error, Result};

/// Attribute keys owned by the descriptor itself or by the rendered template.
///
/// Passthrough attributes may not reuse these names.
pub const RESERVED_ATTRIBUTES: &[&str] = &[
    "name",
    "type",
    "required",
    "default",
    "default_factory",
    "list",
    "show",
    "multiline",
    "placeholder",
    "value",
];

/// Key the rendered template uses for the component type; no field may take it.
pub const COMPONENT_TYPE_KEY: &str = "_type";

/// Describes a single configurable field of a component class.
///
/// Deserialisation goes through [`FieldDescriptorBuilder`], so serialized
/// descriptors are held to the same checks as built ones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldDescriptor")]
pub struct FieldDescriptor {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_factory: Option<DefaultFactoryRef>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    attributes: IndexMap<String, Value>,
}

impl FieldDescriptor {
    /// Starts building a descriptor for the named field and its textual type.
    #[must_use]
    pub fn builder(
        name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> FieldDescriptorBuilder {
        FieldDescriptorBuilder {
            name: name.into(),
            type_name: type_name.into(),
            required: false,
            default: None,
            default_factory: None,
            attributes: IndexMap::new(),
        }
    }

    /// Field name as declared on the class.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type as text, e.g. `Optional[List[str]]`.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Whether the component requires a value for this field.
    #[must_use]
    pub const fn required(&self) -> bool {
        self.required
    }

    /// Literal default value, if one was declared.
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Factory that computes the default value, if one was declared.
    #[must_use]
    pub fn default_factory(&self) -> Option<&DefaultFactoryRef> {
        self.default_factory.as_ref()
    }

    /// Additional attributes carried through to the template verbatim.
    #[must_use]
    pub fn attributes(&self) -> &IndexMap<String, Value> {
        &self.attributes
    }
}

/// Builder for [`FieldDescriptor`].
#[derive(Debug)]
pub struct FieldDescriptorBuilder {
    name: String,
    type_name: String,
    required: bool,
    default: Option<Value>,
    default_factory: Option<DefaultFactoryRef>,
    attributes: IndexMap<String, Value>,
}

impl FieldDescriptorBuilder {
    /// Marks the field as required (or not).
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Declares a literal default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Declares a factory that computes the default value.
    #[must_use]
    pub fn default_factory(mut self, factory: DefaultFactoryRef) -> Self {
        self.default_factory = Some(factory);
        self
    }

    /// Adds a passthrough attribute.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] if the key is empty or collides with one
    /// of the [`RESERVED_ATTRIBUTES`].
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(Error::invalid_field(&self.name, "attribute key cannot be empty"));
        }
        if RESERVED_ATTRIBUTES.contains(&key.as_str()) {
            return Err(Error::invalid_field(
                &self.name,
                format!("attribute `{key}` is reserved"),
            ));
        }
        self.attributes.insert(key, value.into());
        Ok(self)
    }

    /// Finalises the descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] if the name or type is empty, or if both a
    /// literal default and a default factory were declared.
    pub fn build(self) -> Result<FieldDescriptor> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_field("", "field name cannot be empty"));
        }
        if self.name == COMPONENT_TYPE_KEY {
            return Err(Error::invalid_field(
                &self.name,
                "`_type` is reserved for the component type",
            ));
        }
        if self.type_name.trim().is_empty() {
            return Err(Error::invalid_field(&self.name, "field type cannot be empty"));
        }
        if self.default.is_some() && self.default_factory.is_some() {
            return Err(Error::invalid_field(
                &self.name,
                "cannot declare both `default` and `default_factory`",
            ));
        }

        Ok(FieldDescriptor {
            name: self.name,
            type_name: self.type_name,
            required: self.required,
            default: self.default,
            default_factory: self.default_factory,
            attributes: self.attributes,
        })
    }
}

#[derive(Deserialize)]
struct RawFieldDescriptor {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    required: bool,
    #[serde(default, deserialize_with = "present")]
    default: Option<Value>,
    #[serde(default)]
    default_factory: Option<DefaultFactoryRef>,
    #[serde(default)]
    attributes: IndexMap<String, Value>,
}

// Keeps an explicit `null` default distinct from a missing one.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl TryFrom<RawFieldDescriptor> for FieldDescriptor {
    type Error = Error;

    fn try_from(raw: RawFieldDescriptor) -> Result<Self> {
        let mut builder = Self::builder(raw.name, raw.type_name).required(raw.required);
        if let Some(default) = raw.default {
            builder = builder.default_value(default);
        }
        if let Some(factory) = raw.default_factory {
            builder = builder.default_factory(factory);
        }
        for (key, value) in raw.attributes {
            builder = builder.attribute(key, value)?;
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_field_success() {
        let field = FieldDescriptor::builder("temperature", "float")
            .default_value(0.7)
            .attribute("alias", "temp")
            .and_then(FieldDescriptorBuilder::build)
            .expect("build");

        assert_eq!(field.name(), "temperature");
        assert_eq!(field.type_name(), "float");
        assert!(!field.required());
        assert_eq!(field.default(), Some(&serde_json::json!(0.7)));
        assert_eq!(field.attributes().get("alias"), Some(&serde_json::json!("temp")));
    }

    #[test]
    fn reserved_attribute_rejected() {
        let err = FieldDescriptor::builder("prompt", "BasePromptTemplate")
            .attribute("show", true)
            .expect_err("reserved key should fail");

        assert!(matches!(err, Error::InvalidField { field, .. } if field == "prompt"));
    }

    #[test]
    fn default_and_factory_conflict() {
        let err = FieldDescriptor::builder("memory", "BaseMemory")
            .default_value(Value::Null)
            .default_factory(DefaultFactoryRef::function("memory"))
            .build()
            .expect_err("should fail");

        assert!(matches!(err, Error::InvalidField { .. }));
    }

    #[test]
    fn empty_type_rejected() {
        assert!(FieldDescriptor::builder("llm", " ").build().is_err());
        assert!(FieldDescriptor::builder("", "str").build().is_err());
    }

    #[test]
    fn component_type_key_rejected_as_name() {
        let err = FieldDescriptor::builder(COMPONENT_TYPE_KEY, "str")
            .build()
            .expect_err("`_type` clashes with the template key");
        assert!(matches!(err, Error::InvalidField { field, .. } if field == "_type"));
    }

    #[test]
    fn deserialises_through_builder() {
        let field: FieldDescriptor = serde_json::from_value(serde_json::json!({
            "name": "memory",
            "type": "Optional[BaseMemory]",
            "default": null,
            "attributes": { "alias": "mem" },
        }))
        .unwrap();
        assert_eq!(field.default(), Some(&Value::Null));
        assert!(!field.required());
        assert_eq!(field.attributes().get("alias"), Some(&serde_json::json!("mem")));
    }

    #[test]
    fn deserialising_rejects_reserved_attributes() {
        let result = serde_json::from_value::<FieldDescriptor>(serde_json::json!({
            "name": "llm",
            "type": "BaseLLM",
            "required": true,
            "attributes": { "show": false, "type": "evil" },
        }));
        let err = result.expect_err("reserved passthrough keys");
        assert!(err.to_string().contains("llm"));
    }

    #[test]
    fn deserialising_rejects_default_and_factory() {
        let result = serde_json::from_value::<FieldDescriptor>(serde_json::json!({
            "name": "allowed_tools",
            "type": "List[str]",
            "default": [],
            "default_factory": "<function default_tools>",
        }));
        assert!(result.is_err());

        let result = serde_json::from_value::<FieldDescriptor>(serde_json::json!({
            "name": "_type",
            "type": "str",
        }));
        assert!(result.is_err());
    }
}
