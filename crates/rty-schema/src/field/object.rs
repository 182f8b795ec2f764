//! Object fields: validate a mapping against an external type's parameters
//! and construct an [`Instance`] through the [`ObjectType`] capability.

use std::fmt;
use std::sync::Arc;

use rty_core::{Instance, Mapping, SchemaFormatError, ValidationError, Value, TYPE_SENTINEL};
use tracing::trace;

use super::{build_child, Field, ValidateAndBuild};
use crate::object::{ObjectType, TypeResolver};
use crate::typeexpr::{self, ObjectTarget};

/// Compiled fields of an object type's parameters, in declaration order.
/// Untyped parameters have no field.
type ParamFields = Arc<[Option<Field>]>;

#[derive(Clone)]
enum Target {
    /// `params` is `None` when the type refers back to itself and its
    /// parameter fields are compiled on use.
    Fixed {
        ty: Arc<dyn ObjectType>,
        params: Option<ParamFields>,
    },
    Dynamic,
}

#[derive(Clone)]
pub struct ObjectField {
    target: Target,
    resolver: Arc<dyn TypeResolver>,
}

impl ObjectField {
    pub fn new(
        field: &str,
        target: &ObjectTarget,
        params: &Mapping,
        resolver: &Arc<dyn TypeResolver>,
        active: &mut Vec<String>,
    ) -> Result<Self, SchemaFormatError> {
        let invalid = |reason: String| SchemaFormatError::InvalidField {
            field: field.to_string(),
            reason,
        };
        let class_path = match params.get("class_path") {
            None | Some(Value::Null) => None,
            Some(Value::Str(path)) => Some(path.trim()),
            Some(other) => {
                return Err(invalid(format!(
                    "'class_path' must be a string, got {}",
                    other.type_name()
                )))
            }
        };

        let path = match (target, class_path) {
            (ObjectTarget::Dynamic, None) | (ObjectTarget::Dynamic, Some("*")) => None,
            (ObjectTarget::Dynamic, Some(path)) => Some(path),
            (ObjectTarget::Fixed(path), None) => Some(path.as_str()),
            (ObjectTarget::Fixed(path), Some(cp)) if cp == path.as_str() => Some(path.as_str()),
            (ObjectTarget::Fixed(path), Some(cp)) => {
                return Err(invalid(format!(
                    "class_path '{cp}' conflicts with object type '{path}'"
                )))
            }
        };

        let target = match path {
            None => Target::Dynamic,
            Some(path) => {
                let ty = resolver
                    .resolve(path)
                    .ok_or_else(|| SchemaFormatError::UnknownObjectType(path.to_string()))?;
                let params = if active.iter().any(|p| p == ty.type_path()) {
                    None
                } else {
                    let fields = compile_params(ty.as_ref(), resolver, active).map_err(|(param, e)| {
                        invalid(format!(
                            "parameter '{param}' of '{}' has an invalid type: {e}",
                            ty.type_path()
                        ))
                    })?;
                    Some(fields)
                };
                Target::Fixed { ty, params }
            }
        };

        Ok(Self {
            target,
            resolver: Arc::clone(resolver),
        })
    }

    /// Fixed target path, `None` for a dynamic target.
    pub fn type_path(&self) -> Option<&str> {
        match &self.target {
            Target::Fixed { ty, .. } => Some(ty.type_path()),
            Target::Dynamic => None,
        }
    }

    /// Parameter fields for `ty`, compiling them when this field does not
    /// hold them already.
    fn param_fields(&self, ty: &dyn ObjectType) -> Result<ParamFields, ValidationError> {
        if let Target::Fixed {
            params: Some(fields),
            ..
        } = &self.target
        {
            return Ok(Arc::clone(fields));
        }
        compile_params(ty, &self.resolver, &mut Vec::new()).map_err(|(param, e)| {
            ValidationError::new(format!(
                "Parameter '{param}' of '{}' has an invalid type: {e}",
                ty.type_path()
            ))
        })
    }

    fn resolve_from_sentinel(&self, map: &Mapping) -> Result<Arc<dyn ObjectType>, ValidationError> {
        let named = match map.get(TYPE_SENTINEL) {
            None => None,
            Some(Value::Str(path)) => Some(path.as_str()),
            Some(other) => {
                return Err(ValidationError::new(format!(
                    "'{TYPE_SENTINEL}' must be a string, got {}",
                    other.type_name()
                )))
            }
        };
        match (&self.target, named) {
            (Target::Fixed { ty, .. }, None) => Ok(Arc::clone(ty)),
            (Target::Fixed { ty, .. }, Some(path)) if path == ty.type_path() => Ok(Arc::clone(ty)),
            (Target::Fixed { ty, .. }, Some(path)) => Err(ValidationError::new(format!(
                "'{TYPE_SENTINEL}' names '{path}' but this field expects '{}'",
                ty.type_path()
            ))),
            (Target::Dynamic, None) => Err(ValidationError::new(format!(
                "Missing '{TYPE_SENTINEL}' key to resolve object type"
            ))),
            (Target::Dynamic, Some(path)) => self
                .resolver
                .resolve(path)
                .ok_or_else(|| ValidationError::new(format!("Unknown object type '{path}'"))),
        }
    }

    fn construct(&self, ty: &dyn ObjectType, map: &Mapping) -> Result<Value, ValidationError> {
        let path = ty.type_path();
        let args: Mapping = map
            .iter()
            .filter(|(k, _)| k.as_str() != TYPE_SENTINEL)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let missing: Vec<&str> = ty
            .params()
            .iter()
            .filter(|p| p.is_required() && !args.contains_key(&p.name))
            .map(|p| p.name.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::new(format!(
                "Missing required keys: {}",
                quoted_list(&missing)
            )));
        }

        let extra: Vec<&str> = args
            .keys()
            .map(String::as_str)
            .filter(|k| !ty.params().iter().any(|p| p.name == *k))
            .collect();
        if !extra.is_empty() && !ty.accepts_extra() {
            return Err(ValidationError::new(format!(
                "Unexpected keys: {}",
                quoted_list(&extra)
            )));
        }

        let fields = self.param_fields(ty)?;
        let mut validated = Mapping::with_capacity(args.len());
        for (param, field) in ty.params().iter().zip(fields.iter()) {
            let value = match (args.get(&param.name), &param.default) {
                (Some(value), _) => match field {
                    Some(field) => field
                        .validate_and_build(value)
                        .map_err(|e| e.at(&param.name))?,
                    None => value.clone(),
                },
                (None, Some(default)) => default.clone(),
                (None, None) => continue,
            };
            validated.insert(param.name.clone(), value);
        }
        for key in extra {
            if let Some(value) = args.get(key) {
                validated.insert(key.to_string(), value.clone());
            }
        }

        trace!(type_path = path, "constructing object");
        let payload = ty
            .construct(&validated)
            .map_err(|e| ValidationError::new(format!("Failed to create '{path}': {e}")))?;
        Ok(Value::Object(Instance::from_shared(path, validated, payload)))
    }

}

/// Compile a field for every typed parameter of `ty`. On failure, returns
/// the offending parameter name with the error.
fn compile_params(
    ty: &dyn ObjectType,
    resolver: &Arc<dyn TypeResolver>,
    active: &mut Vec<String>,
) -> Result<ParamFields, (String, SchemaFormatError)> {
    active.push(ty.type_path().to_string());
    let fields = ty
        .params()
        .iter()
        .map(|param| match &param.type_expr {
            None => Ok(None),
            Some(expr) => typeexpr::parse(expr, resolver.as_ref())
                .and_then(|spec| build_child(&spec, &param.name, &Mapping::new(), resolver, active))
                .map(Some)
                .map_err(|e| (param.name.clone(), e)),
        })
        .collect::<Result<Vec<_>, _>>();
    active.pop();
    Ok(fields?.into())
}

fn quoted_list(names: &[&str]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{n}'")).collect();
    format!("[{}]", quoted.join(", "))
}

impl ValidateAndBuild for ObjectField {
    fn validate_and_build(&self, value: &Value) -> Result<Value, ValidationError> {
        match value {
            Value::Object(instance) => match &self.target {
                Target::Fixed { ty, .. } if instance.type_path() != ty.type_path() => {
                    Err(ValidationError::new(format!(
                        "Expected an instance of '{}', got '{}'",
                        ty.type_path(),
                        instance.type_path()
                    )))
                }
                _ => Ok(value.clone()),
            },
            Value::Map(map) => {
                let ty = self.resolve_from_sentinel(map)?;
                self.construct(ty.as_ref(), map)
            }
            other => Err(ValidationError::new(format!(
                "Expected a mapping to construct an object, got {}",
                other.type_name()
            ))),
        }
    }
}

impl fmt::Debug for ObjectField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectField")
            .field("type_path", &self.type_path())
            .finish_non_exhaustive()
    }
}
