//! Ordered alternatives; the first alternative that accepts the value wins.

use rty_core::{ValidationError, Value};

use super::{Field, ValidateAndBuild};

#[derive(Debug, Clone)]
pub struct UnionField {
    alternatives: Vec<Field>,
}

impl UnionField {
    pub fn new(alternatives: Vec<Field>) -> Self {
        Self { alternatives }
    }

    pub fn alternatives(&self) -> &[Field] {
        &self.alternatives
    }
}

impl ValidateAndBuild for UnionField {
    fn validate_and_build(&self, value: &Value) -> Result<Value, ValidationError> {
        let mut errors = Vec::with_capacity(self.alternatives.len());
        for alternative in &self.alternatives {
            match alternative.validate_and_build(value) {
                Ok(built) => return Ok(built),
                Err(e) => errors.push(e.to_string()),
            }
        }
        Err(ValidationError::new(format!(
            "{} does not match any allowed type: {}",
            value.literal(),
            errors.join(" | ")
        )))
    }
}
