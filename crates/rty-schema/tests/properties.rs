//! Property tests over generated documents and type expressions.

use proptest::prelude::*;
use rty_core::{Mapping, Value};
use rty_schema::typeexpr::split_top_level;
use rty_schema::{FieldKind, Schema, TypeRegistry};

fn schema() -> Schema {
    let yaml: serde_yaml::Value = serde_yaml::from_str(
        r#"
name: { type: str, length_range: [1, 32] }
port: { type: int, value_range: [1, 65535], required: false, default: 8080 }
ratio: { type: float, required: false, default: 1 }
tags: { type: 'list[str]', required: false, default: [] }
point: { type: 'tuple(int, int)', required: false, default: '(0, 0)' }
mode: { type: 'int | str', required: false, default: auto }
"#,
    )
    .unwrap();
    let Value::Map(definition) = Value::from_yaml(&yaml).unwrap() else {
        panic!("schema must be a mapping");
    };
    Schema::compile(&definition).unwrap()
}

fn document() -> impl Strategy<Value = Mapping> {
    (
        "[a-m]{1,16}",
        prop::option::of(1_i64..=65535),
        prop::option::of(prop_oneof![
            (-1000.0_f64..1000.0).prop_map(Value::Float),
            (-1000_i64..1000).prop_map(Value::Int),
        ]),
        prop::option::of(prop::collection::vec("[a-m0-9]{0,8}", 0..5)),
        prop::option::of((any::<i32>(), any::<i32>())),
        prop::option::of(prop_oneof![
            any::<i64>().prop_map(Value::Int),
            "[a-m]{1,8}".prop_map(Value::Str),
        ]),
    )
        .prop_map(|(name, port, ratio, tags, point, mode)| {
            let mut doc = Mapping::new();
            doc.insert("name".into(), Value::Str(name));
            if let Some(port) = port {
                doc.insert("port".into(), Value::Int(port));
            }
            if let Some(ratio) = ratio {
                doc.insert("ratio".into(), ratio);
            }
            if let Some(tags) = tags {
                doc.insert(
                    "tags".into(),
                    Value::List(tags.into_iter().map(Value::Str).collect()),
                );
            }
            if let Some((x, y)) = point {
                doc.insert("point".into(), Value::Str(format!("({x}, {y})")));
            }
            if let Some(mode) = mode {
                doc.insert("mode".into(), mode);
            }
            doc
        })
}

proptest! {
    #[test]
    fn built_output_is_a_fixed_point(doc in document()) {
        let schema = schema();
        let first = schema.validate(&doc, true).unwrap();
        let second = schema.validate(&first.built, true).unwrap();
        prop_assert_eq!(first.built, second.built);
    }

    #[test]
    fn defaulted_view_reproduces_built_values(doc in document()) {
        let schema = schema();
        let first = schema.validate(&doc, true).unwrap();
        let second = schema.validate(&first.defaulted, true).unwrap();
        prop_assert_eq!(first.built, second.built);
    }

    #[test]
    fn split_top_level_never_splits_inside_brackets(
        parts in prop::collection::vec(
            prop_oneof![
                Just("int".to_string()),
                Just("list[int | str]".to_string()),
                Just("tuple(int, float)".to_string()),
                Just("union[list[int], tuple[str, str]]".to_string()),
            ],
            1..6,
        )
    ) {
        let joined = parts.join(", ");
        let split = split_top_level(&joined, ',').unwrap();
        prop_assert_eq!(split, parts.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn mismatched_closers_are_always_reported(inner in "(int|str|float)", open in 0..2usize) {
        let expr = if open == 0 { format!("list[{inner})") } else { format!("list({inner}]") };
        let err = rty_schema::typeexpr::parse(&expr, &TypeRegistry::new()).unwrap_err();
        prop_assert!(matches!(err, rty_core::SchemaFormatError::MismatchedBrackets(_)));
    }
}

#[test]
fn parsed_list_field_wraps_int_field() {
    let yaml: serde_yaml::Value = serde_yaml::from_str("xs: { type: 'list[int]' }").unwrap();
    let Value::Map(definition) = Value::from_yaml(&yaml).unwrap() else {
        panic!("schema must be a mapping");
    };
    let schema = Schema::compile(&definition).unwrap();
    match schema.root().fields()["xs"].kind() {
        FieldKind::List(list) => assert_eq!(list.item().kind().kind_name(), "int"),
        other => panic!("expected a list field, got {other:?}"),
    }
}
