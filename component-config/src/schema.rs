//! Serde shapes of a catalog document.
//!
//! ```json
//! {
//!   "policy": { "multiline_fields": ["template"] },
//!   "classes": [
//!     {
//!       "name": "LLMChain",
//!       "module": "langchain.chains.llm",
//!       "doc": "Chain to run queries against LLMs.",
//!       "bases": ["Chain"],
//!       "fields": [
//!         { "name": "prompt", "type": "BasePromptTemplate", "required": true },
//!         { "name": "output_key", "type": "str", "default": "text", "alias": "output" }
//!       ]
//!     }
//!   ],
//!   "registry": { "llm_chain": "LLMChain" },
//!   "factories": { "load_llm_chain": "LLMChain" }
//! }
//! ```
//!
//! Unknown keys on a field become passthrough attributes.

use component_primitives::DefaultFactoryRef;
use component_schema::TemplatePolicy;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Top-level catalog document.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogDocument {
    /// Rendering policy; defaults apply when omitted.
    pub policy: Option<TemplatePolicy>,
    /// Declared classes. Bases may be declared in any order.
    pub classes: Vec<ClassSpec>,
    /// Class registry: key to class name.
    pub registry: IndexMap<String, String>,
    /// Factory registry: key to the name of the class the factory returns.
    pub factories: IndexMap<String, String>,
}

/// One declared class.
#[derive(Clone, Debug, Deserialize)]
pub struct ClassSpec {
    /// Class name.
    pub name: String,
    /// Dotted module path.
    pub module: String,
    /// Class documentation text.
    #[serde(default)]
    pub doc: Option<String>,
    /// Direct bases by name, in declaration order.
    #[serde(default)]
    pub bases: Vec<String>,
    /// Fields declared on the class itself.
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

/// One declared field.
#[derive(Clone, Debug, Deserialize)]
pub struct FieldSpec {
    /// Field name.
    pub name: String,
    /// Declared type expression.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Whether the field must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Static default; an explicit `null` is kept.
    #[serde(default, deserialize_with = "present")]
    pub default: Option<Value>,
    /// Function computing the default.
    #[serde(default)]
    pub default_factory: Option<DefaultFactoryRef>,
    /// Remaining keys, forwarded to the template.
    #[serde(flatten)]
    pub attributes: IndexMap<String, Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
