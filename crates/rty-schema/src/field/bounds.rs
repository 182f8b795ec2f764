//! Numeric and length bounds shared by numeric, string and list fields.
//!
//! Bounds come either from explicit `min_*`/`max_*` keywords or from one
//! two-element `*_range` keyword whose entries may be null for an open side.
//! The two forms are mutually exclusive.

use std::cmp::Ordering;
use std::fmt;

use rty_core::{Mapping, SchemaFormatError, Value};

/// Optional lower and upper bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Bounds<T> {
    pub fn none() -> Self {
        Self { min: None, max: None }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Numeric subtype of a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    Int,
    Float,
}

impl NumericKind {
    pub fn name(self) -> &'static str {
        match self {
            NumericKind::Int => "int",
            NumericKind::Float => "float",
        }
    }
}

/// A numeric bound or value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Num::Int(i) => Value::Int(i),
            Num::Float(f) => Value::Float(f),
        }
    }
}

impl PartialOrd for Num {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Num::Int(a), Num::Int(b)) => a.partial_cmp(b),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_value())
    }
}

/// The integer an integral float represents, if it fits `i64`.
///
/// 2^63 is the first float past `i64::MAX`; `as` would saturate it.
pub(super) fn exact_int(f: f64) -> Option<i64> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.is_finite() && f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f) {
        Some(f as i64)
    } else {
        None
    }
}

/// Read `min_value`/`max_value`/`value_range` for a numeric field.
pub fn numeric_bounds(
    field: &str,
    params: &Mapping,
    kind: NumericKind,
) -> Result<Bounds<Num>, SchemaFormatError> {
    read_bounds(field, params, ["min_value", "max_value", "value_range"], |value| {
        match (kind, value) {
            (NumericKind::Int, Value::Int(i)) => Ok(Num::Int(*i)),
            (NumericKind::Int, Value::Float(f)) => exact_int(*f)
                .map(Num::Int)
                .ok_or_else(|| format!("bound {f} is not valid for an int field")),
            (NumericKind::Float, Value::Int(i)) => Ok(Num::Float(*i as f64)),
            (NumericKind::Float, Value::Float(f)) if f.is_finite() => Ok(Num::Float(*f)),
            (NumericKind::Float, Value::Float(f)) => Err(format!("bound {f} is not finite")),
            (_, other) => Err(format!(
                "bound must be a number, got {}",
                other.type_name()
            )),
        }
    })
}

/// Read `min_length`/`max_length`/`length_range`.
pub fn length_bounds(field: &str, params: &Mapping) -> Result<Bounds<usize>, SchemaFormatError> {
    read_bounds(field, params, ["min_length", "max_length", "length_range"], |value| {
        match value {
            Value::Int(i) => {
                usize::try_from(*i).map_err(|_| format!("length bound must be non-negative, got {i}"))
            }
            other => Err(format!(
                "length bound must be an integer, got {}",
                other.type_name()
            )),
        }
    })
}

/// Read an optional boolean flag.
pub fn bool_param(field: &str, params: &Mapping, key: &str) -> Result<Option<bool>, SchemaFormatError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(SchemaFormatError::InvalidField {
            field: field.to_string(),
            reason: format!("'{key}' must be a boolean, got {}", other.type_name()),
        }),
    }
}

fn read_bounds<T, F>(
    field: &str,
    params: &Mapping,
    [min_key, max_key, range_key]: [&str; 3],
    convert: F,
) -> Result<Bounds<T>, SchemaFormatError>
where
    T: PartialOrd + fmt::Display + Copy,
    F: Fn(&Value) -> Result<T, String>,
{
    let invalid = |reason: String| SchemaFormatError::InvalidField {
        field: field.to_string(),
        reason,
    };
    let present = |key: &str| params.get(key).filter(|v| !v.is_null());
    let convert_opt = |value: &Value| -> Result<Option<T>, SchemaFormatError> {
        if value.is_null() {
            Ok(None)
        } else {
            convert(value).map(Some).map_err(|e| invalid(e))
        }
    };

    let bounds = match present(range_key) {
        Some(range) => {
            if present(min_key).is_some() || present(max_key).is_some() {
                return Err(invalid(format!(
                    "'{range_key}' cannot be combined with '{min_key}' or '{max_key}'"
                )));
            }
            let items = range.as_sequence().ok_or_else(|| {
                invalid(format!("'{range_key}' must be a sequence of two values"))
            })?;
            if items.len() != 2 {
                return Err(invalid(format!(
                    "Range must have 2 values, {} provided.",
                    items.len()
                )));
            }
            Bounds {
                min: convert_opt(&items[0])?,
                max: convert_opt(&items[1])?,
            }
        }
        None => Bounds {
            min: present(min_key).map(|v| convert_opt(v)).transpose()?.flatten(),
            max: present(max_key).map(|v| convert_opt(v)).transpose()?.flatten(),
        },
    };

    if let (Some(min), Some(max)) = (bounds.min, bounds.max) {
        if min > max {
            return Err(invalid(format!(
                "Minimal value greater than maximal value ({min} > {max})"
            )));
        }
    }
    Ok(bounds)
}
