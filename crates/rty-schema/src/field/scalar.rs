//! Scalar field kinds.

use rty_core::{Mapping, SchemaFormatError, ValidationError, Value};

use super::bounds::{bool_param, exact_int, length_bounds, numeric_bounds, Bounds, Num, NumericKind};
use super::ValidateAndBuild;

/// Accepts every value unchanged.
#[derive(Debug, Clone, Default)]
pub struct AnyField;

impl ValidateAndBuild for AnyField {
    fn validate_and_build(&self, value: &Value) -> Result<Value, ValidationError> {
        Ok(value.clone())
    }
}

/// Booleans and the textual tokens `true`/`false` in any case.
#[derive(Debug, Clone, Default)]
pub struct BoolField;

impl ValidateAndBuild for BoolField {
    fn validate_and_build(&self, value: &Value) -> Result<Value, ValidationError> {
        match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::Str(s) if s.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
            Value::Str(s) if s.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
            Value::Str(s) if is_empty_token(s) => Err(ValidationError::new(
                "Must be of type bool, contains None or null or empty",
            )),
            Value::Null => Err(ValidationError::new(
                "Must be of type bool, contains None or null or empty",
            )),
            Value::Str(s) => Err(ValidationError::new(format!(
                "Expected a boolean value, got '{s}'"
            ))),
            other => Err(ValidationError::new(format!(
                "Expected a boolean value, got {}",
                other.type_name()
            ))),
        }
    }
}

fn is_empty_token(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || s == "None" || s == "none" || s == "null"
}

/// Integer or float with optional bounds.
#[derive(Debug, Clone)]
pub struct NumericField {
    kind: NumericKind,
    bounds: Bounds<Num>,
}

impl NumericField {
    pub fn new(kind: NumericKind, field: &str, params: &Mapping) -> Result<Self, SchemaFormatError> {
        let bounds = numeric_bounds(field, params, kind)?;
        Ok(Self { kind, bounds })
    }

    pub fn kind(&self) -> NumericKind {
        self.kind
    }

    pub fn bounds(&self) -> Bounds<Num> {
        self.bounds
    }

    fn coerce(&self, value: &Value) -> Result<Num, ValidationError> {
        let type_error = || ValidationError::new(format!("Must be of type {}", self.kind.name()));
        match (self.kind, value) {
            (_, Value::Bool(_)) => Err(ValidationError::new(format!(
                "Must be of type {}, got bool",
                self.kind.name()
            ))),
            (NumericKind::Int, Value::Int(i)) => Ok(Num::Int(*i)),
            (NumericKind::Int, Value::Float(f)) => exact_int(*f).map(Num::Int).ok_or_else(type_error),
            (NumericKind::Float, Value::Int(i)) => Ok(Num::Float(*i as f64)),
            (NumericKind::Float, Value::Float(f)) if f.is_finite() => Ok(Num::Float(*f)),
            (NumericKind::Float, Value::Float(f)) => Err(ValidationError::new(format!(
                "Must be a finite float, got {f}"
            ))),
            (NumericKind::Int, Value::Str(s)) => {
                let s = s.trim();
                match s.parse::<i64>() {
                    Ok(i) => Ok(Num::Int(i)),
                    Err(_) => s
                        .parse::<f64>()
                        .ok()
                        .and_then(exact_int)
                        .map(Num::Int)
                        .ok_or_else(type_error),
                }
            }
            (NumericKind::Float, Value::Str(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Num::Float)
                .ok_or_else(type_error),
            _ => Err(type_error()),
        }
    }
}

impl ValidateAndBuild for NumericField {
    fn validate_and_build(&self, value: &Value) -> Result<Value, ValidationError> {
        let number = self.coerce(value)?;
        if let Some(min) = self.bounds.min {
            if number < min {
                return Err(ValidationError::new(format!("Value must be at least {min}.")));
            }
        }
        if let Some(max) = self.bounds.max {
            if number > max {
                return Err(ValidationError::new(format!("Value must be at most {max}.")));
            }
        }
        Ok(number.into_value())
    }
}

/// Text with optional casting, null handling and length bounds.
#[derive(Debug, Clone)]
pub struct StringField {
    cast_to_string: bool,
    allow_none: bool,
    length: Bounds<usize>,
}

impl StringField {
    pub fn new(field: &str, params: &Mapping) -> Result<Self, SchemaFormatError> {
        Ok(Self {
            cast_to_string: bool_param(field, params, "cast_to_string")?.unwrap_or(true),
            allow_none: bool_param(field, params, "allow_string_to_be_none")?.unwrap_or(false),
            length: length_bounds(field, params)?,
        })
    }

    pub fn casts(&self) -> bool {
        self.cast_to_string
    }
}

impl ValidateAndBuild for StringField {
    fn validate_and_build(&self, value: &Value) -> Result<Value, ValidationError> {
        let text = match value {
            Value::Null => None,
            Value::Str(s) if s == "None" || s == "none" => None,
            Value::Str(s) => Some(s.clone()),
            other if self.cast_to_string => Some(other.to_string()),
            other => {
                return Err(ValidationError::new(format!(
                    "Expected a string, got {}",
                    other.type_name()
                )))
            }
        };
        let text = match text {
            Some(text) => text,
            None if self.allow_none => "None".to_string(),
            None => {
                return Err(ValidationError::new(
                    "Value must not be None; set allow_string_to_be_none to accept it",
                ))
            }
        };

        let len = text.chars().count();
        if let Some(min) = self.length.min {
            if len < min {
                return Err(ValidationError::new(format!(
                    "Value must be at least {min} characters."
                )));
            }
        }
        if let Some(max) = self.length.max {
            if len > max {
                return Err(ValidationError::new(format!(
                    "Value must be at most {max} characters."
                )));
            }
        }
        Ok(Value::Str(text))
    }
}

/// Membership in a closed set of literal values.
#[derive(Debug, Clone)]
pub struct EnumField {
    values: Vec<Value>,
}

impl EnumField {
    pub fn new(field: &str, params: &Mapping) -> Result<Self, SchemaFormatError> {
        let values = match params.get("values") {
            Some(Value::List(items)) if !items.is_empty() => items.clone(),
            _ => {
                return Err(SchemaFormatError::InvalidField {
                    field: field.to_string(),
                    reason: "enum requires 'values' as a non-empty list".to_string(),
                })
            }
        };
        Ok(Self { values })
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl ValidateAndBuild for EnumField {
    fn validate_and_build(&self, value: &Value) -> Result<Value, ValidationError> {
        if self.values.contains(value) {
            Ok(value.clone())
        } else {
            Err(ValidationError::new(format!(
                "Value {} is not one of the allowed values: {}",
                value.literal(),
                Value::List(self.values.clone())
            )))
        }
    }
}

/// Only null, or its textual spellings.
#[derive(Debug, Clone, Default)]
pub struct NoneField;

impl ValidateAndBuild for NoneField {
    fn validate_and_build(&self, value: &Value) -> Result<Value, ValidationError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Str(s) if matches!(s.as_str(), "None" | "none" | "null") => Ok(Value::Null),
            _ => Err(ValidationError::new("Value must be null/None")),
        }
    }
}
