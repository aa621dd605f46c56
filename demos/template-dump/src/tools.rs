//! Tool factories bundled with the binary.
//!
//! The factories are only reached through the link-time registry.

#![allow(dead_code)]

use component_tools::{ConstructorTable, DescribedTool, ToolError, ToolResult, tool_factory};
use serde_json::Value;

pub struct Tool {
    pub name: String,
    pub description: String,
    pub func: fn(&str) -> String,
}

impl Tool {
    pub fn new(name: &str, func: fn(&str) -> String, description: &str) -> Self {
        Self {
            name: name.to_owned(),
            description: description.to_owned(),
            func,
        }
    }
}

impl DescribedTool for Tool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }
}

fn echo(input: &str) -> String {
    input.to_owned()
}

fn shout(input: &str) -> String {
    input.to_uppercase()
}

#[tool_factory(key = "echo")]
pub fn get_echo() -> Tool {
    Tool {
        name: "Echo".into(),
        description: "Repeats its input unchanged.".to_string(),
        func: echo,
    }
}

#[tool_factory(
    key = "shout",
    group = ExtraOptional,
    name = "Shout",
    description = "Repeats its input in capitals."
)]
pub fn get_shout() -> Tool {
    Tool::new("Shout", shout, "Repeats its input in capitals.")
}

/// Constructors the `tool` subcommand may invoke while reading factory source.
pub fn constructors() -> ToolResult<ConstructorTable> {
    ConstructorTable::new().with("EchoTool::named", |args: &[Value]| {
        let name = args
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::execution("EchoTool::named expects a string name"))?;
        Ok(Tool::new(name, echo, "Repeats its input unchanged."))
    })
}
