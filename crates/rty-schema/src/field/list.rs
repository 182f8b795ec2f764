//! Homogeneous lists.

use rty_core::{Mapping, SchemaFormatError, ValidationError, Value};

use super::bounds::{length_bounds, Bounds};
use super::{Field, ValidateAndBuild};

#[derive(Debug, Clone)]
pub struct ListField {
    item: Box<Field>,
    length: Bounds<usize>,
}

impl ListField {
    pub fn new(field: &str, params: &Mapping, item: Field) -> Result<Self, SchemaFormatError> {
        Ok(Self {
            item: Box::new(item),
            length: length_bounds(field, params)?,
        })
    }

    pub fn item(&self) -> &Field {
        &self.item
    }
}

impl ValidateAndBuild for ListField {
    fn validate_and_build(&self, value: &Value) -> Result<Value, ValidationError> {
        let items = match value {
            Value::List(items) => items,
            other => {
                return Err(ValidationError::new(format!(
                    "Expected a list, got {}",
                    other.type_name()
                )))
            }
        };

        if let Some(min) = self.length.min {
            if items.len() < min {
                return Err(ValidationError::new(format!(
                    "List must contain at least {min} items."
                )));
            }
        }
        if let Some(max) = self.length.max {
            if items.len() > max {
                return Err(ValidationError::new(format!(
                    "List must contain at most {max} items."
                )));
            }
        }

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                self.item.validate_and_build(item).map_err(|e| {
                    ValidationError::new(format!("Invalid item at index {i}: {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List)
    }
}
