//! Rendering conventions applied while building templates.

use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, SchemaResult};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_owned()).collect()
}

/// Field and ancestry rules used by the template builder.
///
/// The defaults encode the flow-builder's conventions; catalogs may override
/// individual lists, missing keys keep their default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatePolicy {
    /// Fields never rendered for class registries.
    pub class_excluded_fields: Vec<String>,
    /// Fields never rendered for factory registries.
    pub factory_excluded_fields: Vec<String>,
    /// Module path fragments identifying infrastructure ancestors.
    pub infrastructure_markers: Vec<String>,
    /// Fields always shown.
    pub always_shown: Vec<String>,
    /// Required fields that stay hidden.
    pub hidden_when_required: Vec<String>,
    /// Substrings that make a field shown wherever they appear in its name.
    pub shown_substrings: Vec<String>,
    /// Fields rendered as multi-line inputs.
    pub multiline_fields: Vec<String>,
    /// Fields rendered as tool pickers, whatever their declared type.
    pub tool_fields: Vec<String>,
    /// Fields whose default is forced to `true`.
    pub forced_true_defaults: Vec<String>,
}

impl Default for TemplatePolicy {
    fn default() -> Self {
        Self {
            class_excluded_fields: strings(&["callback_manager"]),
            factory_excluded_fields: strings(&["callback_manager", "requests_wrapper"]),
            infrastructure_markers: strings(&["pydantic", "abc"]),
            always_shown: strings(&[
                "allowed_tools",
                "memory",
                "prefix",
                "examples",
                "temperature",
            ]),
            hidden_when_required: strings(&["input_variables"]),
            shown_substrings: strings(&["api_key"]),
            multiline_fields: strings(&["suffix", "prefix", "template", "examples"]),
            tool_fields: strings(&["allowed_tools"]),
            forced_true_defaults: strings(&["verbose"]),
        }
    }
}

impl TemplatePolicy {
    /// Validates the policy.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidPolicy`] when an infrastructure marker or a
    /// shown substring is empty; either would match every module or field.
    pub fn validate(&self) -> SchemaResult<()> {
        if self.infrastructure_markers.iter().any(|m| m.trim().is_empty()) {
            return Err(SchemaError::InvalidPolicy {
                reason: "infrastructure markers cannot be empty".into(),
            });
        }
        if self.shown_substrings.iter().any(|s| s.trim().is_empty()) {
            return Err(SchemaError::InvalidPolicy {
                reason: "shown substrings cannot be empty".into(),
            });
        }
        Ok(())
    }

    pub(crate) fn is_infrastructure(&self, module: &str) -> bool {
        self.infrastructure_markers
            .iter()
            .any(|marker| module.contains(marker.as_str()))
    }
}

pub(crate) fn contains(list: &[String], key: &str) -> bool {
    list.iter().any(|item| item == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let policy: TemplatePolicy =
            serde_json::from_str(r#"{ "multiline_fields": ["prompt"] }"#).unwrap();
        assert_eq!(policy.multiline_fields, ["prompt"]);
        assert_eq!(policy.tool_fields, ["allowed_tools"]);
        policy.validate().unwrap();
    }

    #[test]
    fn empty_marker_is_rejected() {
        let policy = TemplatePolicy {
            infrastructure_markers: vec![String::new()],
            ..TemplatePolicy::default()
        };
        assert!(matches!(
            policy.validate(),
            Err(SchemaError::InvalidPolicy { .. })
        ));
    }

    #[test]
    fn detects_infrastructure_modules() {
        let policy = TemplatePolicy::default();
        assert!(policy.is_infrastructure("pydantic.main"));
        assert!(policy.is_infrastructure("abc"));
        assert!(!policy.is_infrastructure("langchain.chains.base"));
    }
}
