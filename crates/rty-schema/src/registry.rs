//! # Field Registry and Factory
//!
//! The registry is a static table mapping primitive type keywords to field
//! kinds. Lookup is an exact, case-sensitive match: every accepted casing
//! (`int`, `Int`, `INT`) is its own entry, so `iNt` is unknown rather than
//! silently folded.
//!
//! The same table drives the configuration keyword list of every kind
//! ([`KIND_KEYWORDS`]), which is what the reserved-keyword checker and the
//! unknown-parameter check read.
//!
//! [`FieldFactory`] is the entry point that turns a type expression plus a
//! field configuration into a compiled [`Field`]: it parses the expression
//! (composite syntax is handled by [`typeexpr`](crate::typeexpr), which calls
//! back into [`lookup`] for bare tokens) and then runs the two-phase field
//! construction.

use std::fmt;
use std::sync::Arc;

use rty_core::{Mapping, SchemaFormatError};

use crate::config::FieldConfig;
use crate::field::Field;
use crate::object::{TypeRegistry, TypeResolver};
use crate::typeexpr::{self, FieldSpec, ObjectTarget};

/// Scalar field kinds addressable by a bare keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Any,
    Bool,
    Int,
    Float,
    Str,
    Enum,
    None,
}

impl PrimitiveKind {
    /// Canonical keyword.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Any => "any",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Str => "str",
            PrimitiveKind::Enum => "enum",
            PrimitiveKind::None => "None",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Primitive type keywords. Case-sensitive; each casing is listed explicitly.
pub const FIELD_REGISTRY: &[(&str, PrimitiveKind)] = &[
    ("any", PrimitiveKind::Any),
    ("Any", PrimitiveKind::Any),
    ("ANY", PrimitiveKind::Any),
    ("bool", PrimitiveKind::Bool),
    ("Bool", PrimitiveKind::Bool),
    ("BOOL", PrimitiveKind::Bool),
    ("int", PrimitiveKind::Int),
    ("Int", PrimitiveKind::Int),
    ("INT", PrimitiveKind::Int),
    ("float", PrimitiveKind::Float),
    ("Float", PrimitiveKind::Float),
    ("FLOAT", PrimitiveKind::Float),
    ("str", PrimitiveKind::Str),
    ("Str", PrimitiveKind::Str),
    ("STR", PrimitiveKind::Str),
    ("enum", PrimitiveKind::Enum),
    ("Enum", PrimitiveKind::Enum),
    ("ENUM", PrimitiveKind::Enum),
    ("None", PrimitiveKind::None),
    ("none", PrimitiveKind::None),
    ("NONE", PrimitiveKind::None),
];

/// Bare keyword for an object field whose target comes from `class_path`
/// or the sentinel key.
pub const OBJECT_KEYWORD: &str = "object";

/// Keywords every field definition may carry regardless of kind.
pub const COMMON_KEYWORDS: &[&str] = &["type", "description", "required", "default"];

const NUMERIC_KEYWORDS: &[&str] = &["min_value", "max_value", "value_range"];
const LENGTH_KEYWORDS: &[&str] = &["min_length", "max_length", "length_range"];
const STRING_KEYWORDS: &[&str] = &[
    "min_length",
    "max_length",
    "length_range",
    "cast_to_string",
    "allow_string_to_be_none",
];

/// Kind-specific configuration keywords, by canonical kind name.
pub const KIND_KEYWORDS: &[(&str, &[&str])] = &[
    ("any", &[]),
    ("bool", &[]),
    ("int", NUMERIC_KEYWORDS),
    ("float", NUMERIC_KEYWORDS),
    ("str", STRING_KEYWORDS),
    ("enum", &["values"]),
    ("None", &[]),
    ("list", LENGTH_KEYWORDS),
    ("tuple", &[]),
    ("union", &[]),
    ("object", &["class_path"]),
];

/// Look up a bare type token.
pub fn lookup(token: &str) -> Option<FieldSpec> {
    if token == OBJECT_KEYWORD {
        return Some(FieldSpec::Object(ObjectTarget::Dynamic));
    }
    FIELD_REGISTRY
        .iter()
        .find(|(keyword, _)| *keyword == token)
        .map(|(_, kind)| FieldSpec::Primitive(*kind))
}

/// Kind-specific keywords for a canonical kind name.
pub fn keywords_for(kind_name: &str) -> &'static [&'static str] {
    KIND_KEYWORDS
        .iter()
        .find(|(name, _)| *name == kind_name)
        .map(|(_, keywords)| *keywords)
        .unwrap_or(&[])
}

/// Builds fields from type expressions.
///
/// Holds the object type resolver consulted for `object[...]` targets and
/// for bare tokens that name an external type.
#[derive(Clone)]
pub struct FieldFactory {
    resolver: Arc<dyn TypeResolver>,
}

impl FieldFactory {
    pub fn new(resolver: Arc<dyn TypeResolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Arc<dyn TypeResolver> {
        &self.resolver
    }

    /// Parse `type_str` into its deferred constructor.
    pub fn parse(&self, type_str: &str) -> Result<FieldSpec, SchemaFormatError> {
        typeexpr::parse(type_str, self.resolver.as_ref())
    }

    /// Parse `type_str` and construct the field described by `config`.
    pub fn create_field(
        &self,
        type_str: &str,
        config: &FieldConfig,
    ) -> Result<Field, SchemaFormatError> {
        let spec = self.parse(type_str)?;
        Field::from_spec(&spec, config, &self.resolver)
    }

    /// Build a field from its schema definition mapping (`type` plus
    /// configuration keys).
    pub fn build_field(&self, name: &str, definition: &Mapping) -> Result<Field, SchemaFormatError> {
        let (type_str, config) = FieldConfig::from_definition(name, definition)?;
        self.create_field(&type_str, &config)
    }
}

impl Default for FieldFactory {
    fn default() -> Self {
        Self::new(Arc::new(TypeRegistry::new()))
    }
}

impl fmt::Debug for FieldFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldFactory").finish_non_exhaustive()
    }
}
