//! # Sections
//!
//! A [`Section`] is a named node holding fields and subsections. Validation
//! walks the document alongside the section tree and produces two views:
//!
//! - `built`: every declared field's built value (input or default), every
//!   subsection's built mapping, and, outside strict mode, undeclared keys
//!   carried through verbatim.
//! - `defaulted`: a copy of the input with absent optional entries filled
//!   in, for writing the document back with its defaults made explicit.
//!
//! Errors are wrapped with the key being validated as they propagate, so
//! the error surfaced at the root carries the full path.

use std::borrow::Cow;

use indexmap::IndexMap;
use rty_core::{Mapping, ValidationError, Value};
use tracing::debug;

use crate::field::Field;

/// The two result views of a successful validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub built: Mapping,
    pub defaulted: Mapping,
}

#[derive(Debug, Clone)]
pub struct Section {
    name: String,
    title: Option<String>,
    description: String,
    required: bool,
    fields: IndexMap<String, Field>,
    subsections: IndexMap<String, Section>,
}

impl Section {
    /// An empty, required section.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            description: String::new(),
            required: true,
            fields: IndexMap::new(),
            subsections: IndexMap::new(),
        }
    }

    /// The key this section is declared under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable name from the section's `name` metadata.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Name used in messages, `<root>` for the unnamed root.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "<root>"
        } else {
            &self.name
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn fields(&self) -> &IndexMap<String, Field> {
        &self.fields
    }

    pub fn subsections(&self) -> &IndexMap<String, Section> {
        &self.subsections
    }

    pub(crate) fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub(crate) fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub(crate) fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    pub(crate) fn insert_field(&mut self, key: impl Into<String>, field: Field) {
        self.fields.insert(key.into(), field);
    }

    pub(crate) fn insert_subsection(&mut self, key: impl Into<String>, section: Section) {
        self.subsections.insert(key.into(), section);
    }

    fn is_declared(&self, key: &str) -> bool {
        self.fields.contains_key(key) || self.subsections.contains_key(key)
    }

    /// Validate `data` against this section.
    pub fn build_and_validate(&self, data: &Mapping, strict: bool) -> Result<Validated, ValidationError> {
        let extras: Vec<&String> = data.keys().filter(|k| !self.is_declared(k)).collect();
        if strict && !extras.is_empty() {
            let mut keys: Vec<&str> = extras.iter().map(|k| k.as_str()).collect();
            keys.sort_unstable();
            return Err(ValidationError::new(format!(
                "Unexpected key(s) in section '{}': {}",
                self.display_name(),
                keys.join(", ")
            )));
        }

        let mut built = Mapping::with_capacity(self.fields.len() + self.subsections.len());
        let mut defaulted = data.clone();

        for (key, field) in &self.fields {
            match data.get(key) {
                Some(value) => {
                    let value = field.validate_and_build(value).map_err(|e| e.at(key))?;
                    built.insert(key.clone(), value);
                }
                None if field.is_required() => {
                    return Err(ValidationError::new(format!("Missing required field '{key}'")));
                }
                None => {
                    let default = field.default().cloned().unwrap_or(Value::Null);
                    defaulted.insert(key.clone(), default.clone());
                    built.insert(key.clone(), default);
                }
            }
        }

        for (key, section) in &self.subsections {
            let sub: Cow<'_, Mapping> = match data.get(key) {
                Some(Value::Map(map)) => Cow::Borrowed(map),
                Some(Value::Null) => Cow::Owned(Mapping::new()),
                Some(other) => {
                    return Err(ValidationError::new(format!(
                        "Expected a mapping for section '{key}', got {}",
                        other.type_name()
                    ))
                    .at(key));
                }
                None if section.is_required() => {
                    return Err(ValidationError::new(format!("Missing required section '{key}'")));
                }
                None => Cow::Owned(Mapping::new()),
            };
            let result = section.build_and_validate(&sub, strict).map_err(|e| e.at(key))?;
            built.insert(key.clone(), Value::Map(result.built));
            defaulted.insert(key.clone(), Value::Map(result.defaulted));
        }

        if !extras.is_empty() {
            debug!(section = self.display_name(), keys = ?extras, "carrying unexpected keys through");
            for key in extras {
                built.insert(key.clone(), data[key.as_str()].clone());
            }
        }

        Ok(Validated { built, defaulted })
    }
}
