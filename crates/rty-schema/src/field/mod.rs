//! # Field Kinds
//!
//! A [`Field`] is the compiled validator for one value slot. Its behavior is
//! a closed set of kinds ([`FieldKind`]), each implementing
//! [`ValidateAndBuild`]: a pure, reentrant check-and-coerce of one value.
//!
//! ## Construction
//!
//! Fields are built in two phases by [`Field::from_spec`]:
//!
//! 1. Build the kind tree from the parsed type expression, handing each
//!    node the configuration keywords its kind accepts. Composites consume
//!    their own keywords and forward the rest to their children.
//! 2. For an optional field, run the raw default (null when absent) through
//!    the field's own validation. A failure is a schema format error; the
//!    built result is what gets substituted for missing input.
//!
//! Children of composites are always required and never carry a default.

mod bounds;
mod list;
mod object;
mod scalar;
mod tuple;
mod union;

use std::collections::BTreeSet;
use std::sync::Arc;

use rty_core::{Mapping, SchemaFormatError, ValidationError, Value};
use tracing::debug;

use crate::config::FieldConfig;
use crate::object::TypeResolver;
use crate::registry::{keywords_for, PrimitiveKind};
use crate::typeexpr::FieldSpec;

pub use bounds::{Bounds, Num, NumericKind};
pub use list::ListField;
pub use object::ObjectField;
pub use scalar::{AnyField, BoolField, EnumField, NoneField, NumericField, StringField};
pub use tuple::{parse_tuple_literal, TupleField};
pub use union::UnionField;

/// Validate one value and produce its built form.
pub trait ValidateAndBuild {
    fn validate_and_build(&self, value: &Value) -> Result<Value, ValidationError>;
}

/// The kind of a compiled field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Any(AnyField),
    Bool(BoolField),
    Numeric(NumericField),
    Str(StringField),
    Enum(EnumField),
    None(NoneField),
    List(ListField),
    Tuple(TupleField),
    Union(UnionField),
    Object(ObjectField),
}

impl FieldKind {
    /// Canonical kind name. `int` and `float` are distinct kinds.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldKind::Any(_) => "any",
            FieldKind::Bool(_) => "bool",
            FieldKind::Numeric(n) => n.kind().name(),
            FieldKind::Str(_) => "str",
            FieldKind::Enum(_) => "enum",
            FieldKind::None(_) => "None",
            FieldKind::List(_) => "list",
            FieldKind::Tuple(_) => "tuple",
            FieldKind::Union(_) => "union",
            FieldKind::Object(_) => "object",
        }
    }

    /// Canonical type expression of this kind.
    pub fn type_expr(&self) -> String {
        let join = |fields: &[Field]| {
            fields
                .iter()
                .map(Field::type_expr)
                .collect::<Vec<_>>()
                .join(", ")
        };
        match self {
            FieldKind::List(list) => format!("list[{}]", list.item().type_expr()),
            FieldKind::Tuple(tuple) => format!("tuple[{}]", join(tuple.items())),
            FieldKind::Union(union) => format!("union[{}]", join(union.alternatives())),
            FieldKind::Object(object) => format!("object[{}]", object.type_path().unwrap_or("*")),
            other => other.kind_name().to_string(),
        }
    }
}

impl ValidateAndBuild for FieldKind {
    fn validate_and_build(&self, value: &Value) -> Result<Value, ValidationError> {
        match self {
            FieldKind::Any(f) => f.validate_and_build(value),
            FieldKind::Bool(f) => f.validate_and_build(value),
            FieldKind::Numeric(f) => f.validate_and_build(value),
            FieldKind::Str(f) => f.validate_and_build(value),
            FieldKind::Enum(f) => f.validate_and_build(value),
            FieldKind::None(f) => f.validate_and_build(value),
            FieldKind::List(f) => f.validate_and_build(value),
            FieldKind::Tuple(f) => f.validate_and_build(value),
            FieldKind::Union(f) => f.validate_and_build(value),
            FieldKind::Object(f) => f.validate_and_build(value),
        }
    }
}

/// A compiled field.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    description: String,
    required: bool,
    default: Option<Value>,
    kind: FieldKind,
}

impl Field {
    /// Build a field from a parsed type expression and its configuration.
    pub fn from_spec(
        spec: &FieldSpec,
        config: &FieldConfig,
        resolver: &Arc<dyn TypeResolver>,
    ) -> Result<Field, SchemaFormatError> {
        let name = config.name.as_str();

        let accepted = accepted_keywords(spec);
        let mut unknown: Vec<String> = config
            .params
            .keys()
            .filter(|k| !accepted.contains(k.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            unknown.sort();
            return Err(SchemaFormatError::UnknownParameters {
                field: name.to_string(),
                params: unknown,
            });
        }

        if config.required && config.default.is_some() {
            return Err(SchemaFormatError::InvalidField {
                field: name.to_string(),
                reason: "a required field cannot declare a default; set required: false"
                    .to_string(),
            });
        }

        let kind = build_kind(spec, name, &config.params, resolver, &mut Vec::new())?;
        let mut field = Field {
            name: name.to_string(),
            description: config.description.clone(),
            required: config.required,
            default: None,
            kind,
        };

        if !config.required {
            let raw = config.default.clone().unwrap_or(Value::Null);
            let built = field.kind.validate_and_build(&raw).map_err(|e| {
                SchemaFormatError::InvalidDefault {
                    field: name.to_string(),
                    reason: e.to_string(),
                }
            })?;
            field.default = Some(built);
        }

        debug!(field = name, type_expr = %field.type_expr(), required = field.required, "compiled field");
        Ok(field)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Built default, present only for optional fields.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn type_expr(&self) -> String {
        self.kind.type_expr()
    }

    pub fn validate_and_build(&self, value: &Value) -> Result<Value, ValidationError> {
        self.kind.validate_and_build(value)
    }
}

/// Keywords accepted anywhere in the kind tree of `spec`.
pub fn accepted_keywords(spec: &FieldSpec) -> BTreeSet<&'static str> {
    let mut accepted: BTreeSet<&'static str> = keywords_for(spec.kind_name()).iter().copied().collect();
    for child in spec.children() {
        accepted.extend(accepted_keywords(child));
    }
    accepted
}

fn own_params(kind_name: &str, params: &Mapping) -> Mapping {
    let own = keywords_for(kind_name);
    params
        .iter()
        .filter(|(k, _)| own.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Build a required, default-less child field from the keywords its kind
/// tree accepts.
///
/// `active` holds the object type paths whose parameters are being compiled
/// further up the tree.
pub(crate) fn build_child(
    spec: &FieldSpec,
    name: &str,
    params: &Mapping,
    resolver: &Arc<dyn TypeResolver>,
    active: &mut Vec<String>,
) -> Result<Field, SchemaFormatError> {
    let accepted = accepted_keywords(spec);
    let params: Mapping = params
        .iter()
        .filter(|(k, _)| accepted.contains(k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Ok(Field {
        name: name.to_string(),
        description: String::new(),
        required: true,
        default: None,
        kind: build_kind(spec, name, &params, resolver, active)?,
    })
}

fn build_kind(
    spec: &FieldSpec,
    name: &str,
    params: &Mapping,
    resolver: &Arc<dyn TypeResolver>,
    active: &mut Vec<String>,
) -> Result<FieldKind, SchemaFormatError> {
    let own = own_params(spec.kind_name(), params);
    let kind = match spec {
        FieldSpec::Primitive(PrimitiveKind::Any) => FieldKind::Any(AnyField),
        FieldSpec::Primitive(PrimitiveKind::Bool) => FieldKind::Bool(BoolField),
        FieldSpec::Primitive(PrimitiveKind::Int) => {
            FieldKind::Numeric(NumericField::new(NumericKind::Int, name, &own)?)
        }
        FieldSpec::Primitive(PrimitiveKind::Float) => {
            FieldKind::Numeric(NumericField::new(NumericKind::Float, name, &own)?)
        }
        FieldSpec::Primitive(PrimitiveKind::Str) => FieldKind::Str(StringField::new(name, &own)?),
        FieldSpec::Primitive(PrimitiveKind::Enum) => FieldKind::Enum(EnumField::new(name, &own)?),
        FieldSpec::Primitive(PrimitiveKind::None) => FieldKind::None(NoneField),
        FieldSpec::List(item) => {
            let rest: Mapping = params
                .iter()
                .filter(|(k, _)| !own.contains_key(k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            let item = build_child(item, name, &rest, resolver, active)?;
            FieldKind::List(ListField::new(name, &own, item)?)
        }
        FieldSpec::Tuple(items) => {
            let items = items
                .iter()
                .map(|item| build_child(item, name, params, resolver, active))
                .collect::<Result<Vec<_>, _>>()?;
            FieldKind::Tuple(TupleField::new(items))
        }
        FieldSpec::Union(alternatives) => {
            FieldKind::Union(build_union(name, alternatives, params, resolver, active)?)
        }
        FieldSpec::Object(target) => {
            FieldKind::Object(ObjectField::new(name, target, &own, resolver, active)?)
        }
    };
    Ok(kind)
}

fn build_union(
    name: &str,
    alternatives: &[FieldSpec],
    params: &Mapping,
    resolver: &Arc<dyn TypeResolver>,
    active: &mut Vec<String>,
) -> Result<UnionField, SchemaFormatError> {
    let is_str = |spec: &FieldSpec| matches!(spec, FieldSpec::Primitive(PrimitiveKind::Str));

    if alternatives.iter().any(is_str) && params.get("cast_to_string") == Some(&Value::Bool(true)) {
        return Err(SchemaFormatError::InvalidField {
            field: name.to_string(),
            reason: "a string alternative with cast_to_string enabled accepts every value; \
                     remove cast_to_string from the union"
                .to_string(),
        });
    }

    let mut fields = Vec::with_capacity(alternatives.len());
    let mut seen = BTreeSet::new();
    for alternative in alternatives {
        let field = if is_str(alternative) && !params.contains_key("cast_to_string") {
            let mut params = params.clone();
            params.insert("cast_to_string".to_string(), Value::Bool(false));
            build_child(alternative, name, &params, resolver, active)?
        } else {
            build_child(alternative, name, params, resolver, active)?
        };
        let kind_name = field.kind().kind_name();
        if !seen.insert(kind_name) {
            return Err(SchemaFormatError::InvalidField {
                field: name.to_string(),
                reason: format!("Duplicate field types found in union: {kind_name}"),
            });
        }
        fields.push(field);
    }
    Ok(UnionField::new(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{FnObjectType, Param, TypeRegistry};
    use crate::registry::FieldFactory;
    use rty_core::{Instance, TYPE_SENTINEL};

    #[derive(Debug, PartialEq)]
    struct Point {
        x: i64,
        y: i64,
    }

    fn arg_int(args: &Mapping, key: &str) -> Result<i64, String> {
        match args.get(key) {
            Some(Value::Int(i)) => Ok(*i),
            other => Err(format!("{key} must be an int, got {other:?}")),
        }
    }

    fn registry() -> TypeRegistry {
        TypeRegistry::new()
            .with(
                FnObjectType::new("geo.Point", |args| {
                    let point = Point {
                        x: arg_int(args, "x")?,
                        y: arg_int(args, "y")?,
                    };
                    Ok(Arc::new(point))
                })
                .param(Param::required("x").typed("int"))
                .param(Param::optional("y", 0).typed("int")),
            )
            .with(
                FnObjectType::new("geo.Tag", |args| Ok(Arc::new(args.clone())))
                    .param(Param::required("label"))
                    .with_extra(),
            )
            .with(
                FnObjectType::new("geo.Broken", |_| Err("constructor exploded".to_string()))
                    .param(Param::optional("a", 1)),
            )
            .with(
                FnObjectType::new("geo.Box", |args| Ok(Arc::new(args.clone())))
                    .param(Param::required("inner").typed("object[geo.Missing]")),
            )
            .with(
                FnObjectType::new("geo.Chain", |args| Ok(Arc::new(args.clone())))
                    .param(Param::required("value").typed("int"))
                    .param(Param::optional("next", Value::Null).typed("geo.Chain | None")),
            )
    }

    fn factory() -> FieldFactory {
        FieldFactory::new(Arc::new(registry()))
    }

    fn field(type_str: &str) -> Field {
        factory().create_field(type_str, &FieldConfig::new("f")).unwrap()
    }

    fn field_with(type_str: &str, config: FieldConfig) -> Result<Field, SchemaFormatError> {
        factory().create_field(type_str, &config)
    }

    fn map(entries: &[(&str, Value)]) -> Value {
        Value::Map(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn kind_matches_outer_form() {
        assert!(matches!(field("list[int]").kind(), FieldKind::List(_)));
        assert!(matches!(field("tuple(int, str)").kind(), FieldKind::Tuple(_)));
        assert!(matches!(field("int | str").kind(), FieldKind::Union(_)));
        assert!(matches!(field("object[geo.Point]").kind(), FieldKind::Object(_)));
        assert!(matches!(field("geo.Point").kind(), FieldKind::Object(_)));
        match field("list[int]").kind() {
            FieldKind::List(list) => assert_eq!(list.item().kind().kind_name(), "int"),
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn required_field_with_default_is_rejected() {
        let mut config = FieldConfig::new("f");
        config.default = Some(Value::Int(1));
        let err = field_with("int", config).unwrap_err();
        assert!(matches!(err, SchemaFormatError::InvalidField { .. }));
    }

    #[test]
    fn invalid_default_is_a_format_error() {
        let err = field_with("int", FieldConfig::new("port").optional("abc")).unwrap_err();
        assert!(matches!(err, SchemaFormatError::InvalidDefault { .. }));
        assert!(err.to_string().contains("invalid default value"));
    }

    #[test]
    fn optional_without_default_must_accept_null() {
        assert!(field_with("int", FieldConfig::new("n").not_required()).is_err());
        let field = field_with("None", FieldConfig::new("n").not_required()).unwrap();
        assert_eq!(field.default(), Some(&Value::Null));
    }

    #[test]
    fn default_is_stored_built() {
        let field = field_with("bool", FieldConfig::new("flag").optional("True")).unwrap();
        assert_eq!(field.default(), Some(&Value::Bool(true)));
    }

    #[test]
    fn enum_default_must_be_a_member() {
        let config = FieldConfig::new("color")
            .param("values", Value::List(vec!["red".into(), "green".into()]))
            .optional("blue");
        assert!(matches!(
            field_with("enum", config),
            Err(SchemaFormatError::InvalidDefault { .. })
        ));
    }

    #[test]
    fn unknown_parameters_are_listed_sorted() {
        let config = FieldConfig::new("n")
            .param("rnage", Value::List(vec![]))
            .param("max_lenght", 3);
        let err = field_with("int", config).unwrap_err();
        assert_eq!(
            err,
            SchemaFormatError::UnknownParameters {
                field: "n".into(),
                params: vec!["max_lenght".into(), "rnage".into()],
            }
        );
    }

    #[test]
    fn list_keywords_bound_the_list_and_forward_the_rest() {
        let config = FieldConfig::new("tags")
            .param("max_length", 2)
            .param("cast_to_string", false);
        let field = field_with("list[str]", config).unwrap();
        let err = field
            .validate_and_build(&Value::List(vec!["a".into(), "b".into(), "c".into()]))
            .unwrap_err();
        assert_eq!(err.message(), "List must contain at most 2 items.");
        let err = field
            .validate_and_build(&Value::List(vec!["a".into(), Value::Int(1)]))
            .unwrap_err();
        assert!(err.message().starts_with("Invalid item at index 1:"));
    }

    #[test]
    fn list_of_int_reports_index() {
        let field = field("list[int]");
        let err = field
            .validate_and_build(&Value::List(vec![1.into(), 2.into(), "x".into()]))
            .unwrap_err();
        assert_eq!(err.message(), "Invalid item at index 2: Must be of type int");
        assert_eq!(
            field.validate_and_build(&Value::List(vec![])).unwrap(),
            Value::List(vec![])
        );
    }

    #[test]
    fn nested_lists() {
        let field = field("list[list[int]]");
        let value = Value::List(vec![Value::List(vec!["1".into()]), Value::List(vec![])]);
        assert_eq!(
            field.validate_and_build(&value).unwrap(),
            Value::List(vec![Value::List(vec![Value::Int(1)]), Value::List(vec![])])
        );
    }

    #[test]
    fn tuple_from_literal_and_native() {
        let field = field("tuple(int, str)");
        assert_eq!(
            field.validate_and_build(&"(1, 2)".into()).unwrap(),
            Value::Tuple(vec![Value::Int(1), "2".into()])
        );
        let err = field.validate_and_build(&"(abc, 2)".into()).unwrap_err();
        assert!(err.message().starts_with("Tuple element 0 invalid"));
        let err = field.validate_and_build(&"(1, 2, 3)".into()).unwrap_err();
        assert_eq!(err.message(), "Tuple must contain exactly 2 elements (got 3)");
        let err = field.validate_and_build(&Value::Null).unwrap_err();
        assert_eq!(err.message(), "None is not a valid tuple");
        assert!(field
            .validate_and_build(&Value::List(vec![1.into(), "a".into()]))
            .is_err());
    }

    #[test]
    fn tuple_literal_with_mapping_elements() {
        let field = field("tuple(int, any)");
        let built = field
            .validate_and_build(&"(1, {'a': 2, 'b': 3})".into())
            .unwrap();
        assert_eq!(
            built,
            Value::Tuple(vec![Value::Int(1), map(&[("a", 2.into()), ("b", 3.into())])])
        );
    }

    #[test]
    fn tuple_with_object_slot() {
        let field = field("tuple(int, geo.Point)");
        let built = field.validate_and_build(&"(1, {'x': 2})".into()).unwrap();
        let Value::Tuple(items) = &built else {
            panic!("expected a tuple, got {built:?}");
        };
        let Value::Object(point) = &items[1] else {
            panic!("expected an instance, got {:?}", items[1]);
        };
        assert_eq!(point.downcast_ref::<Point>(), Some(&Point { x: 2, y: 0 }));

        // The text form carries the sentinel and validates to the same tuple.
        let text = built.to_string();
        assert_eq!(text, "(1, {'_type_': 'geo.Point', 'x': 2, 'y': 0})");
        assert_eq!(field.validate_and_build(&text.into()).unwrap(), built);
    }

    #[test]
    fn union_precedence_follows_declaration_order() {
        let field = field("str | int");
        assert_eq!(field.validate_and_build(&"123".into()).unwrap(), Value::from("123"));
        assert_eq!(field.validate_and_build(&Value::Int(123)).unwrap(), Value::Int(123));

        let field = self::field("int | str");
        assert_eq!(field.validate_and_build(&"123".into()).unwrap(), Value::Int(123));
    }

    #[test]
    fn union_aggregates_every_branch_failure() {
        let field = field("int | bool");
        let err = field.validate_and_build(&"maybe".into()).unwrap_err();
        assert!(err.message().starts_with("'maybe' does not match any allowed type:"));
        assert!(err.message().contains("Must be of type int"));
        assert!(err.message().contains("Expected a boolean value"));
    }

    #[test]
    fn union_rejects_duplicate_kinds() {
        let err = field_with("int | int", FieldConfig::new("u")).unwrap_err();
        assert!(err.to_string().contains("Duplicate field types found in union"));
        assert!(field_with("int | float", FieldConfig::new("u")).is_ok());
        assert!(field_with("object[geo.Point] | object[geo.Tag]", FieldConfig::new("u")).is_err());
    }

    #[test]
    fn union_rejects_casting_string_alternative() {
        let config = FieldConfig::new("u").param("cast_to_string", true);
        assert!(field_with("str | int", config).is_err());
        let config = FieldConfig::new("u").param("cast_to_string", false);
        assert!(field_with("str | int", config).is_ok());
    }

    #[test]
    fn union_with_none_alternative() {
        let field = field_with("int | None", FieldConfig::new("u").not_required()).unwrap();
        assert_eq!(field.default(), Some(&Value::Null));
        assert_eq!(field.validate_and_build(&"7".into()).unwrap(), Value::Int(7));
    }

    #[test]
    fn fixed_object_constructs_instance() {
        let field = field("object[geo.Point]");
        let built = field
            .validate_and_build(&map(&[("x", "3".into())]))
            .unwrap();
        let Value::Object(instance) = &built else {
            panic!("expected an instance, got {built:?}");
        };
        assert_eq!(instance.type_path(), "geo.Point");
        assert_eq!(instance.args()["y"], Value::Int(0));
        assert_eq!(instance.downcast_ref::<Point>(), Some(&Point { x: 3, y: 0 }));

        // Re-validating a built instance returns it unchanged.
        assert_eq!(field.validate_and_build(&built).unwrap(), built);
    }

    #[test]
    fn object_parameter_errors() {
        let field = field("object[geo.Point]");
        let err = field.validate_and_build(&map(&[("y", 1.into())])).unwrap_err();
        assert_eq!(err.message(), "Missing required keys: ['x']");
        let err = field
            .validate_and_build(&map(&[("x", 1.into()), ("z", 2.into())]))
            .unwrap_err();
        assert_eq!(err.message(), "Unexpected keys: ['z']");
        let err = field.validate_and_build(&map(&[("x", "abc".into())])).unwrap_err();
        assert_eq!(err.path(), &["x".to_string()]);
    }

    #[test]
    fn object_extra_keys_when_accepted() {
        let field = field("object[geo.Tag]");
        let built = field
            .validate_and_build(&map(&[("label", "a".into()), ("color", "red".into())]))
            .unwrap();
        let Value::Object(instance) = built else {
            panic!("expected an instance");
        };
        assert_eq!(instance.args().len(), 2);
    }

    #[test]
    fn object_constructor_failure_names_the_type() {
        let field = field("object[geo.Broken]");
        let err = field.validate_and_build(&map(&[])).unwrap_err();
        assert_eq!(err.message(), "Failed to create 'geo.Broken': constructor exploded");
    }

    #[test]
    fn dynamic_object_uses_sentinel() {
        let field = field("object[*]");
        let built = field
            .validate_and_build(&map(&[(TYPE_SENTINEL, "geo.Point".into()), ("x", 1.into())]))
            .unwrap();
        assert!(matches!(built, Value::Object(_)));
        let err = field.validate_and_build(&map(&[("x", 1.into())])).unwrap_err();
        assert_eq!(err.message(), "Missing '_type_' key to resolve object type");
        let err = field
            .validate_and_build(&map(&[(TYPE_SENTINEL, "geo.Nope".into())]))
            .unwrap_err();
        assert!(err.message().contains("Unknown object type"));
    }

    #[test]
    fn fixed_object_checks_matching_sentinel() {
        let field = field("object[geo.Point]");
        assert!(field
            .validate_and_build(&map(&[(TYPE_SENTINEL, "geo.Point".into()), ("x", 1.into())]))
            .is_ok());
        assert!(field
            .validate_and_build(&map(&[(TYPE_SENTINEL, "geo.Tag".into()), ("x", 1.into())]))
            .is_err());
        let other = Instance::new("geo.Tag", Mapping::new(), ());
        assert!(field.validate_and_build(&Value::Object(other)).is_err());
    }

    #[test]
    fn class_path_fixes_bare_object() {
        let config = FieldConfig::new("p").param("class_path", "geo.Point");
        let field = field_with("object", config).unwrap();
        assert_eq!(field.type_expr(), "object[geo.Point]");

        let config = FieldConfig::new("p").param("class_path", "geo.Tag");
        assert!(field_with("object[geo.Point]", config).is_err());
    }

    #[test]
    fn unknown_fixed_object_type() {
        let err = field_with("object[geo.Missing]", FieldConfig::new("p")).unwrap_err();
        assert_eq!(err, SchemaFormatError::UnknownObjectType("geo.Missing".into()));
    }

    #[test]
    fn invalid_parameter_type_fails_at_compile_time() {
        let err = field_with("object[geo.Box]", FieldConfig::new("b")).unwrap_err();
        let SchemaFormatError::InvalidField { field, reason } = &err else {
            panic!("expected an invalid field error, got {err:?}");
        };
        assert_eq!(field, "b");
        assert!(reason.contains("parameter 'inner' of 'geo.Box'"), "{reason}");
        assert!(reason.contains("geo.Missing"), "{reason}");

        assert!(field_with("list[geo.Box]", FieldConfig::new("b")).is_err());
    }

    #[test]
    fn self_referential_object_type() {
        let field = field("object[geo.Chain]");
        let built = field
            .validate_and_build(&map(&[
                ("value", 1.into()),
                ("next", map(&[("value", "2".into())])),
            ]))
            .unwrap();
        let Value::Object(head) = &built else {
            panic!("expected an instance, got {built:?}");
        };
        let Value::Object(next) = &head.args()["next"] else {
            panic!("expected a nested instance");
        };
        assert_eq!(next.args()["value"], Value::Int(2));
        assert_eq!(next.args()["next"], Value::Null);

        let err = field
            .validate_and_build(&map(&[
                ("value", 1.into()),
                ("next", map(&[("value", "x".into())])),
            ]))
            .unwrap_err();
        assert_eq!(err.path().first().map(String::as_str), Some("next"));
    }

    #[test]
    fn canonical_type_expressions() {
        assert_eq!(field("INT").type_expr(), "int");
        assert_eq!(field("list(int|str)").type_expr(), "list[union[int, str]]");
        assert_eq!(field("tuple(float, None)").type_expr(), "tuple[float, None]");
        assert_eq!(field("geo.Point").type_expr(), "object[geo.Point]");
    }
}
