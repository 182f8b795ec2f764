//! # Error Types — Two Disjoint Error Kinds
//!
//! rty distinguishes failures by *when* they happen:
//!
//! - [`SchemaFormatError`] is raised only while compiling a schema
//!   definition (bad field configuration, conflicting bounds, invalid
//!   default, reserved-name collision, malformed type expression, broken
//!   `$ref`). Compilation aborts; no partial schema is usable.
//! - [`ValidationError`] is raised only while validating a document against
//!   an already-compiled schema. It carries the key path to the offending
//!   value and a human-readable message that composite fields augment with
//!   index or slot context as it propagates outward.
//!
//! [`RtyError`] wraps both for callers that drive compilation and
//! validation together.

use thiserror::Error;

/// Top-level error type for rty.
#[derive(Error, Debug)]
pub enum RtyError {
    /// The schema definition is malformed.
    #[error("schema format error: {0}")]
    Format(#[from] SchemaFormatError),

    /// A document did not conform to the compiled schema.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error raised while compiling a schema definition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaFormatError {
    /// The type expression names no registered kind and no known object type.
    #[error("unknown field type: {0}")]
    UnknownType(String),

    /// A type expression (or one part of a composite) is empty.
    #[error("unknown field type: empty type expression in '{0}'")]
    EmptyType(String),

    /// Opening and closing brackets do not match by kind or count.
    #[error("mismatched brackets in type: {0}")]
    MismatchedBrackets(String),

    /// A composite expression has the wrong number of inner parts.
    #[error("invalid composite type '{expr}': {reason}")]
    InvalidComposite {
        /// The full composite expression.
        expr: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A field's configuration is inconsistent.
    #[error("field '{field}': {reason}")]
    InvalidField {
        /// Field name.
        field: String,
        /// Reason the configuration was rejected.
        reason: String,
    },

    /// An optional field's default does not pass the field's own validation.
    #[error("field '{field}' got invalid default value: {reason}")]
    InvalidDefault {
        /// Field name.
        field: String,
        /// The validation failure produced by the default.
        reason: String,
    },

    /// A field definition carries keywords no kind in its type accepts.
    #[error("field '{field}' got unknown parameters: {}", .params.join(", "))]
    UnknownParameters {
        /// Field name.
        field: String,
        /// Offending keywords, sorted.
        params: Vec<String>,
    },

    /// A data field name collides with a field-kind configuration keyword.
    #[error("the field name '{0}' is reserved by one or more field kinds (used as a configuration keyword); please choose a different name")]
    ReservedName(String),

    /// A fixed object target could not be resolved.
    #[error("unknown object type '{0}'")]
    UnknownObjectType(String),

    /// A section mapping contains something that is neither metadata, a
    /// field definition, nor a subsection.
    #[error("section '{section}': {reason}")]
    InvalidSection {
        /// Section name (`<root>` for the schema root).
        section: String,
        /// Reason the section was rejected.
        reason: String,
    },

    /// A `$ref` could not be loaded.
    #[error("cannot resolve $ref '{reference}': {reason}")]
    Reference {
        /// The reference as written in the schema.
        reference: String,
        /// Reason the reference could not be resolved.
        reason: String,
    },

    /// A `$ref` chain refers back to itself.
    #[error("cyclic $ref detected: {}", .chain.join(" -> "))]
    CyclicReference {
        /// The active reference chain, ending with the repeated reference.
        chain: Vec<String>,
    },
}

/// Error raised while validating a document.
///
/// `path` holds the section and field keys from the root down to the value
/// that failed; it is empty for failures at the root itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}{message}", path_prefix(.path))]
pub struct ValidationError {
    path: Vec<String>,
    message: String,
}

impl ValidationError {
    /// Create an error at the current position.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            message: message.into(),
        }
    }

    /// Record that the failure happened beneath `key`.
    ///
    /// Called by the enclosing section as the error propagates outward, so
    /// the outermost key ends up first.
    pub fn at(mut self, key: impl Into<String>) -> Self {
        self.path.insert(0, key.into());
        self
    }

    /// The failure message without path context.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Keys from the root to the failing value.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Dotted form of [`path`](Self::path), `(root)` when empty.
    pub fn path_string(&self) -> String {
        if self.path.is_empty() {
            "(root)".to_string()
        } else {
            self.path.join(".")
        }
    }
}

fn path_prefix(path: &[String]) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!("{}: ", path.join("."))
    }
}
