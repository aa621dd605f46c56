//! Sectioned docstring parsing.
//!
//! Docstrings follow a Google-style layout: free text first, then optional
//! sections introduced by a line holding only `Parameters:`, `Attributes:`,
//! `Example:` or `Returns:`. Keyed sections list one `name: description`
//! entry per line.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{SchemaError, SchemaResult};

/// Section of a class docstring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocSection {
    /// Leading free text.
    Description,
    /// Constructor parameters.
    Parameters,
    /// Documented fields; used as form placeholders.
    Attributes,
    /// Usage example lines.
    Example,
    /// Documented return values.
    Returns,
}

impl DocSection {
    const ALL: [Self; 5] = [
        Self::Description,
        Self::Parameters,
        Self::Attributes,
        Self::Example,
        Self::Returns,
    ];

    /// Section title as written in docstrings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Description => "Description",
            Self::Parameters => "Parameters",
            Self::Attributes => "Attributes",
            Self::Example => "Example",
            Self::Returns => "Returns",
        }
    }

    /// Recognises a section header line such as `Attributes:`.
    fn from_header(line: &str) -> Option<Self> {
        let title = line.strip_suffix(':')?;
        Self::ALL.into_iter().find(|section| section.as_str() == title)
    }
}

/// Structured view of a class docstring.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ClassDoc {
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Parameters")]
    parameters: IndexMap<String, String>,
    #[serde(rename = "Attributes")]
    attributes: IndexMap<String, String>,
    #[serde(rename = "Example")]
    example: Vec<String>,
    #[serde(rename = "Returns")]
    returns: IndexMap<String, String>,
}

impl ClassDoc {
    /// Parses a docstring into its sections.
    ///
    /// Blank lines are skipped and every line is trimmed. Description lines are
    /// concatenated without a separator, example lines are kept one entry per
    /// line, and keyed sections are split on the first `:`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MalformedDoc`] when a line inside `Parameters`,
    /// `Attributes` or `Returns` has no `:` separator.
    pub fn parse(doc: &str) -> SchemaResult<Self> {
        let mut parsed = Self::default();
        let mut section = DocSection::Description;

        for line in doc.lines().map(str::trim).filter(|line| !line.is_empty()) {
            if let Some(next) = DocSection::from_header(line) {
                section = next;
                continue;
            }

            match section {
                DocSection::Description => parsed.description.push_str(line),
                DocSection::Example => parsed.example.push(line.to_owned()),
                DocSection::Parameters | DocSection::Attributes | DocSection::Returns => {
                    let (key, value) =
                        line.split_once(':').ok_or_else(|| SchemaError::MalformedDoc {
                            section: section.as_str(),
                            line: line.to_owned(),
                        })?;
                    parsed
                        .entries_mut(section)
                        .insert(key.trim().to_owned(), value.trim().to_owned());
                }
            }
        }

        Ok(parsed)
    }

    fn entries_mut(&mut self, section: DocSection) -> &mut IndexMap<String, String> {
        match section {
            DocSection::Parameters => &mut self.parameters,
            DocSection::Returns => &mut self.returns,
            _ => &mut self.attributes,
        }
    }

    /// Concatenated description text.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Documented parameters.
    #[must_use]
    pub fn parameters(&self) -> &IndexMap<String, String> {
        &self.parameters
    }

    /// Documented attributes keyed by field name.
    #[must_use]
    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    /// Example lines.
    #[must_use]
    pub fn example(&self) -> &[String] {
        &self.example
    }

    /// Documented return values.
    #[must_use]
    pub fn returns(&self) -> &IndexMap<String, String> {
        &self.returns
    }

    /// Placeholder text for a field: its attribute doc or an empty string.
    #[must_use]
    pub fn placeholder(&self, field: &str) -> &str {
        self.attributes.get(field).map_or("", String::as_str)
    }
}
