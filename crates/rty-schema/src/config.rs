//! Field configuration: the common keys every field carries plus the
//! kind-specific parameters handed on to the field kind.

use rty_core::{Mapping, SchemaFormatError, Value};

/// Configuration of one field, as read from its schema definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    pub name: String,
    pub description: String,
    pub required: bool,
    pub default: Option<Value>,
    /// Kind-specific keywords (`min_value`, `cast_to_string`, ...).
    pub params: Mapping,
}

impl FieldConfig {
    /// Required field with no description and no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            required: true,
            default: None,
            params: Mapping::new(),
        }
    }

    /// Make the field optional with `default`.
    pub fn optional(mut self, default: impl Into<Value>) -> Self {
        self.required = false;
        self.default = Some(default.into());
        self
    }

    /// Make the field optional with no default (the default is null).
    pub fn not_required(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Split a field definition mapping into its type expression and
    /// configuration.
    pub fn from_definition(
        name: &str,
        definition: &Mapping,
    ) -> Result<(String, FieldConfig), SchemaFormatError> {
        let invalid = |reason: String| SchemaFormatError::InvalidField {
            field: name.to_string(),
            reason,
        };

        let mut config = FieldConfig::new(name);
        let mut type_str = None;
        for (key, value) in definition {
            match key.as_str() {
                "type" => match value {
                    Value::Str(s) => type_str = Some(s.clone()),
                    other => {
                        return Err(invalid(format!(
                            "'type' must be a string, got {}",
                            other.type_name()
                        )))
                    }
                },
                "description" => match value {
                    Value::Str(s) => config.description = s.clone(),
                    Value::Null => {}
                    other => {
                        return Err(invalid(format!(
                            "'description' must be a string, got {}",
                            other.type_name()
                        )))
                    }
                },
                "required" => match value {
                    Value::Bool(b) => config.required = *b,
                    other => {
                        return Err(invalid(format!(
                            "'required' must be a boolean, got {}",
                            other.type_name()
                        )))
                    }
                },
                "default" => config.default = Some(value.clone()),
                _ => {
                    config.params.insert(key.clone(), value.clone());
                }
            }
        }
        let type_str = type_str.ok_or_else(|| invalid("missing 'type'".to_string()))?;
        Ok((type_str, config))
    }
}
