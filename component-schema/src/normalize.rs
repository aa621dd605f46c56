//! Normalisation of raw field records into rendered form fields.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::policy::{TemplatePolicy, contains};

/// Field metadata collected from a descriptor before normalisation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldRecord {
    /// Declared type text.
    pub type_name: String,
    /// Whether a value is required.
    pub required: bool,
    /// Default value, literal or produced by a factory.
    pub default: Option<Value>,
    /// Placeholder text taken from the class documentation.
    pub placeholder: String,
    /// List flag settled by an earlier normalisation, if any.
    pub list: Option<bool>,
    /// Passthrough attributes.
    pub attributes: IndexMap<String, Value>,
}

/// A field as rendered by the flow-builder form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedField {
    /// Normalised type vocabulary entry.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Whether the field holds a list of `type_name`.
    pub list: bool,
    /// Whether the form shows the field.
    pub show: bool,
    /// Whether the form renders a multi-line input.
    pub multiline: bool,
    /// Whether a value is required.
    pub required: bool,
    /// Placeholder text.
    pub placeholder: String,
    /// Initial value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Passthrough attributes.
    #[serde(flatten)]
    pub attributes: IndexMap<String, Value>,
}

impl From<NormalizedField> for FieldRecord {
    fn from(field: NormalizedField) -> Self {
        Self {
            type_name: field.type_name,
            required: field.required,
            default: field.value,
            placeholder: field.placeholder,
            list: Some(field.list),
            attributes: field.attributes,
        }
    }
}

fn unwrap_generic<'t>(type_name: &'t str, wrapper: &str) -> Option<&'t str> {
    type_name
        .strip_prefix(wrapper)?
        .strip_prefix('[')?
        .strip_suffix(']')
}

/// Applies the flow-builder's field conventions.
#[derive(Debug, Clone, Copy)]
pub struct FieldNormalizer<'a> {
    policy: &'a TemplatePolicy,
}

impl<'a> FieldNormalizer<'a> {
    /// Creates a normaliser for the given policy.
    #[must_use]
    pub const fn new(policy: &'a TemplatePolicy) -> Self {
        Self { policy }
    }

    /// Normalises every record, preserving order.
    #[must_use]
    pub fn normalize(
        &self,
        fields: IndexMap<String, FieldRecord>,
    ) -> IndexMap<String, NormalizedField> {
        fields
            .into_iter()
            .map(|(key, record)| {
                let field = self.normalize_field(&key, record);
                (key, field)
            })
            .collect()
    }

    /// Normalises a single record.
    ///
    /// One `Optional[...]` wrapper and then one `List[...]` wrapper are
    /// stripped from the type, `Mapping` becomes `dict`, tool fields become
    /// `Tool`, and the `show`/`multiline` flags are derived from the key.
    #[must_use]
    pub fn normalize_field(&self, key: &str, record: FieldRecord) -> NormalizedField {
        let policy = self.policy;
        let mut default = record.default;
        if contains(&policy.forced_true_defaults, key) {
            default = Some(Value::Bool(true));
        }

        let mut type_name = record.type_name.as_str();
        if let Some(inner) = unwrap_generic(type_name, "Optional") {
            type_name = inner;
        }

        let (type_name, is_list) = match unwrap_generic(type_name, "List") {
            Some(inner) => (inner, true),
            None => (type_name, false),
        };
        let list = is_list || record.list.unwrap_or(false);

        let type_name = if contains(&policy.tool_fields, key) {
            "Tool".to_owned()
        } else {
            type_name.replace("Mapping", "dict")
        };

        let show = (record.required && !contains(&policy.hidden_when_required, key))
            || contains(&policy.always_shown, key)
            || policy
                .shown_substrings
                .iter()
                .any(|fragment| key.contains(fragment.as_str()));

        NormalizedField {
            type_name,
            list,
            show,
            multiline: contains(&policy.multiline_fields, key),
            required: record.required,
            placeholder: record.placeholder,
            value: default,
            attributes: record.attributes,
        }
    }
}
