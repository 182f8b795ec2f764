//! # Type Expressions
//!
//! Parses the textual type language into a [`FieldSpec`], a deferred
//! constructor that is later combined with a field's configuration.
//!
//! Recognition order, first match wins:
//!
//! 1. `object[...]` / `object(...)`: `*` for a dynamic target, otherwise a
//!    fixed type path.
//! 2. `tuple[...]`: one or more comma-separated element types.
//! 3. `list[...]`: exactly one element type.
//! 4. `A | B | ...`: pipe-separated alternatives at bracket depth 0.
//! 5. `union[...]`: one or more comma-separated alternatives.
//! 6. A registered keyword (see [`registry`](crate::registry)).
//! 7. A path the [`TypeResolver`] knows, as a fixed object target.
//!
//! A composite only matches when its opening bracket closes at the final
//! character, so `list[int] | list[str]` falls through to the pipe rule.
//! Brackets `[]` and `()` are interchangeable but must pair by kind.

use std::fmt;

use rty_core::SchemaFormatError;
use tracing::trace;

use crate::object::TypeResolver;
use crate::registry::{self, PrimitiveKind};

/// Parsed type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSpec {
    Primitive(PrimitiveKind),
    List(Box<FieldSpec>),
    Tuple(Vec<FieldSpec>),
    Union(Vec<FieldSpec>),
    Object(ObjectTarget),
}

/// Target of an object field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectTarget {
    /// A single type path, fixed at compile time.
    Fixed(String),
    /// Resolved per value from the `_type_` key.
    Dynamic,
}

impl FieldSpec {
    /// Canonical kind name. Union alternatives are compared by this.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldSpec::Primitive(kind) => kind.name(),
            FieldSpec::List(_) => "list",
            FieldSpec::Tuple(_) => "tuple",
            FieldSpec::Union(_) => "union",
            FieldSpec::Object(_) => "object",
        }
    }

    /// Direct children of a composite.
    pub fn children(&self) -> &[FieldSpec] {
        match self {
            FieldSpec::List(inner) => std::slice::from_ref(inner.as_ref()),
            FieldSpec::Tuple(items) | FieldSpec::Union(items) => items,
            FieldSpec::Primitive(_) | FieldSpec::Object(_) => &[],
        }
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSpec::Primitive(kind) => write!(f, "{kind}"),
            FieldSpec::List(inner) => write!(f, "list[{inner}]"),
            FieldSpec::Tuple(items) => write!(f, "tuple[{}]", join(items)),
            FieldSpec::Union(items) => write!(f, "union[{}]", join(items)),
            FieldSpec::Object(ObjectTarget::Dynamic) => write!(f, "object[*]"),
            FieldSpec::Object(ObjectTarget::Fixed(path)) => write!(f, "object[{path}]"),
        }
    }
}

fn join(items: &[FieldSpec]) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Parse a type expression.
pub fn parse(expr: &str, resolver: &dyn TypeResolver) -> Result<FieldSpec, SchemaFormatError> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err(SchemaFormatError::EmptyType(expr.to_string()));
    }
    trace!(expr, "parsing type expression");

    if let Some(inner) = extract_composite(expr, "object")? {
        let inner = inner.trim();
        return match inner {
            "" => Err(invalid(expr, "object requires a type path or '*'")),
            "*" => Ok(FieldSpec::Object(ObjectTarget::Dynamic)),
            path => Ok(FieldSpec::Object(ObjectTarget::Fixed(path.to_string()))),
        };
    }

    if let Some(inner) = extract_composite(expr, "tuple")? {
        if inner.trim().is_empty() {
            return Err(invalid(expr, "tuple requires at least one element type"));
        }
        let items = parse_parts(expr, inner, ',', resolver)?;
        return Ok(FieldSpec::Tuple(items));
    }

    if let Some(inner) = extract_composite(expr, "list")? {
        if inner.trim().is_empty() {
            return Err(invalid(expr, "list requires exactly one element type, got none"));
        }
        let parts = split_top_level(inner, ',')?;
        if parts.len() != 1 {
            return Err(invalid(
                expr,
                &format!("list requires exactly one element type, got {}", parts.len()),
            ));
        }
        return Ok(FieldSpec::List(Box::new(parse(parts[0], resolver)?)));
    }

    let alternatives = split_top_level(expr, '|')?;
    if alternatives.len() > 1 {
        let items = parse_parts(expr, expr, '|', resolver)?;
        return Ok(FieldSpec::Union(items));
    }

    if let Some(inner) = extract_composite(expr, "union")? {
        if inner.trim().is_empty() {
            return Err(invalid(expr, "union requires at least one alternative"));
        }
        let items = parse_parts(expr, inner, ',', resolver)?;
        return Ok(FieldSpec::Union(items));
    }

    if let Some(spec) = registry::lookup(expr) {
        return Ok(spec);
    }

    if resolver.resolve(expr).is_some() {
        return Ok(FieldSpec::Object(ObjectTarget::Fixed(expr.to_string())));
    }

    Err(SchemaFormatError::UnknownType(expr.to_string()))
}

fn parse_parts(
    expr: &str,
    body: &str,
    sep: char,
    resolver: &dyn TypeResolver,
) -> Result<Vec<FieldSpec>, SchemaFormatError> {
    split_top_level(body, sep)?
        .into_iter()
        .map(|part| {
            if part.is_empty() {
                Err(SchemaFormatError::EmptyType(expr.to_string()))
            } else {
                parse(part, resolver)
            }
        })
        .collect()
}

fn invalid(expr: &str, reason: &str) -> SchemaFormatError {
    SchemaFormatError::InvalidComposite {
        expr: expr.to_string(),
        reason: reason.to_string(),
    }
}

fn closing_for(open: char) -> char {
    if open == '[' {
        ']'
    } else {
        ')'
    }
}

/// Split `s` on `sep` at bracket depth 0. Parts are trimmed.
///
/// Fails when brackets are unbalanced or pair across kinds.
pub fn split_top_level(s: &str, sep: char) -> Result<Vec<&str>, SchemaFormatError> {
    let mut parts = Vec::new();
    let mut stack: Vec<char> = Vec::new();
    let mut start = 0;
    for (i, ch) in s.char_indices() {
        match ch {
            '[' | '(' => stack.push(ch),
            ']' | ')' => match stack.pop() {
                Some(open) if closing_for(open) == ch => {}
                _ => return Err(SchemaFormatError::MismatchedBrackets(s.to_string())),
            },
            c if c == sep && stack.is_empty() => {
                parts.push(s[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    if !stack.is_empty() {
        return Err(SchemaFormatError::MismatchedBrackets(s.to_string()));
    }
    parts.push(s[start..].trim());
    Ok(parts)
}

/// If `expr` is `keyword[...]` or `keyword(...)` with the opening bracket
/// closing at the final character, return the text between the brackets.
fn extract_composite<'a>(
    expr: &'a str,
    keyword: &str,
) -> Result<Option<&'a str>, SchemaFormatError> {
    let Some(rest) = expr.strip_prefix(keyword) else {
        return Ok(None);
    };
    if !rest.starts_with(['[', '(']) {
        return Ok(None);
    }
    let mut stack: Vec<char> = Vec::new();
    for (i, ch) in rest.char_indices() {
        match ch {
            '[' | '(' => stack.push(ch),
            ']' | ')' => {
                match stack.pop() {
                    Some(open) if closing_for(open) == ch => {}
                    _ => return Err(SchemaFormatError::MismatchedBrackets(expr.to_string())),
                }
                if stack.is_empty() {
                    if i + ch.len_utf8() == rest.len() {
                        return Ok(Some(&rest[1..i]));
                    }
                    return Ok(None);
                }
            }
            _ => {}
        }
    }
    Err(SchemaFormatError::MismatchedBrackets(expr.to_string()))
}
