//! # Schema Compilation
//!
//! A schema definition is a nested mapping. Inside a section mapping:
//!
//! - `name`, `description` (string) and `required` (bool) are section
//!   metadata;
//! - a mapping with a `type` key is a field definition;
//! - any other mapping is a subsection;
//! - a mapping with a `$ref` key is first replaced by the referenced
//!   fragment with its own inline keys merged on top, then classified.
//!
//! [`SchemaCompiler`] carries the compile-time configuration: the object
//! type resolver, the optional `$ref` resolver, and the maximum reference
//! nesting depth. The compiled [`Schema`] is immutable and may be shared
//! across threads.

use std::fmt;
use std::sync::Arc;

use rty_core::{Mapping, SchemaFormatError, ValidationError, Value};
use tracing::debug;

use crate::object::TypeResolver;
use crate::registry::FieldFactory;
use crate::reserved::check_field_name;
use crate::section::{Section, Validated};

/// Mapping key that pulls in an external fragment.
pub const REF_KEY: &str = "$ref";

/// Default limit on nested `$ref` resolution.
pub const DEFAULT_MAX_REF_DEPTH: usize = 32;

/// Loads `$ref` fragments.
pub trait RefResolver: Send + Sync {
    /// Load the mapping a reference points at.
    fn resolve(&self, reference: &str) -> Result<Mapping, String>;

    /// Stable identity of a reference, used for cycle detection. Two
    /// spellings of the same target should map to the same identity.
    fn identity(&self, reference: &str) -> String {
        reference.to_string()
    }
}

/// A compiled schema: the root section.
#[derive(Debug, Clone)]
pub struct Schema {
    root: Section,
}

impl Schema {
    /// Compile with the default [`SchemaCompiler`].
    pub fn compile(definition: &Mapping) -> Result<Schema, SchemaFormatError> {
        SchemaCompiler::new().compile(definition)
    }

    pub fn root(&self) -> &Section {
        &self.root
    }

    /// Validate a document mapping.
    pub fn validate(&self, data: &Mapping, strict: bool) -> Result<Validated, ValidationError> {
        self.root.build_and_validate(data, strict)
    }

    /// Validate a document value; null is treated as an empty document.
    pub fn validate_value(&self, data: &Value, strict: bool) -> Result<Validated, ValidationError> {
        match data {
            Value::Map(map) => self.validate(map, strict),
            Value::Null => self.validate(&Mapping::new(), strict),
            other => Err(ValidationError::new(format!(
                "Expected a mapping at the document root, got {}",
                other.type_name()
            ))),
        }
    }
}

/// Compile-time configuration and entry point.
#[derive(Clone)]
pub struct SchemaCompiler {
    factory: FieldFactory,
    refs: Option<Arc<dyn RefResolver>>,
    max_ref_depth: usize,
}

impl Default for SchemaCompiler {
    fn default() -> Self {
        Self {
            factory: FieldFactory::default(),
            refs: None,
            max_ref_depth: DEFAULT_MAX_REF_DEPTH,
        }
    }
}

impl fmt::Debug for SchemaCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaCompiler")
            .field("refs", &self.refs.is_some())
            .field("max_ref_depth", &self.max_ref_depth)
            .finish_non_exhaustive()
    }
}

impl SchemaCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve object types through `resolver`.
    pub fn with_types(mut self, resolver: Arc<dyn TypeResolver>) -> Self {
        self.factory = FieldFactory::new(resolver);
        self
    }

    /// Resolve `$ref` keys through `refs`. Without one, any `$ref` is an
    /// error.
    pub fn with_refs(mut self, refs: Arc<dyn RefResolver>) -> Self {
        self.refs = Some(refs);
        self
    }

    pub fn max_ref_depth(mut self, depth: usize) -> Self {
        self.max_ref_depth = depth;
        self
    }

    pub fn factory(&self) -> &FieldFactory {
        &self.factory
    }

    pub fn compile(&self, definition: &Mapping) -> Result<Schema, SchemaFormatError> {
        let mut chain = Vec::new();
        let (definition, _) = self.expand_refs(definition, &mut chain)?;
        let root = self.compile_section("", &definition, &mut chain)?;
        debug!(
            fields = root.fields().len(),
            sections = root.subsections().len(),
            "compiled schema"
        );
        Ok(Schema { root })
    }

    /// Replace `$ref` chains in `mapping` by their merged fragments.
    ///
    /// Pushes each followed reference onto `chain` and returns how many were
    /// pushed; the caller pops them once the merged content is compiled.
    fn expand_refs(
        &self,
        mapping: &Mapping,
        chain: &mut Vec<String>,
    ) -> Result<(Mapping, usize), SchemaFormatError> {
        let mut current = mapping.clone();
        let mut pushed = 0;
        while let Some(reference) = current.get(REF_KEY) {
            let reference = match reference {
                Value::Str(s) => s.clone(),
                other => {
                    return Err(SchemaFormatError::Reference {
                        reference: other.to_string(),
                        reason: format!("'{REF_KEY}' must be a string"),
                    })
                }
            };
            let refs = self.refs.as_ref().ok_or_else(|| SchemaFormatError::Reference {
                reference: reference.clone(),
                reason: "no reference resolver configured".to_string(),
            })?;

            let identity = refs.identity(&reference);
            if chain.contains(&identity) {
                let mut cycle = chain.clone();
                cycle.push(identity);
                return Err(SchemaFormatError::CyclicReference { chain: cycle });
            }
            if chain.len() >= self.max_ref_depth {
                return Err(SchemaFormatError::Reference {
                    reference,
                    reason: format!("reference nesting exceeds {} levels", self.max_ref_depth),
                });
            }
            chain.push(identity);
            pushed += 1;

            debug!(reference = %reference, depth = chain.len(), "resolving reference");
            let mut merged = refs
                .resolve(&reference)
                .map_err(|reason| SchemaFormatError::Reference {
                    reference: reference.clone(),
                    reason,
                })?;
            for (key, value) in current {
                if key != REF_KEY {
                    merged.insert(key, value);
                }
            }
            current = merged;
        }
        Ok((current, pushed))
    }

    fn compile_section(
        &self,
        name: &str,
        definition: &Mapping,
        chain: &mut Vec<String>,
    ) -> Result<Section, SchemaFormatError> {
        let mut section = Section::new(name);
        for (key, value) in definition {
            match (key.as_str(), value) {
                ("name", Value::Str(s)) => section.set_title(s.clone()),
                ("description", Value::Str(s)) => section.set_description(s.clone()),
                ("description", Value::Null) => {}
                ("required", Value::Bool(b)) => section.set_required(*b),
                (_, Value::Map(entry)) => {
                    let (entry, pushed) = self.expand_refs(entry, chain)?;
                    if entry.contains_key("type") {
                        check_field_name(key)?;
                        let field = self.factory.build_field(key, &entry)?;
                        section.insert_field(key.clone(), field);
                    } else {
                        let subsection = self.compile_section(key, &entry, chain)?;
                        section.insert_subsection(key.clone(), subsection);
                    }
                    chain.truncate(chain.len() - pushed);
                }
                (_, other) => {
                    return Err(SchemaFormatError::InvalidSection {
                        section: section.display_name().to_string(),
                        reason: format!(
                            "'{key}' must be a field definition (a mapping with 'type') or a subsection mapping, got {}",
                            other.type_name()
                        ),
                    })
                }
            }
        }
        debug!(
            section = section.display_name(),
            fields = section.fields().len(),
            subsections = section.subsections().len(),
            "compiled section"
        );
        Ok(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MemoryRefs(HashMap<String, Mapping>);

    impl RefResolver for MemoryRefs {
        fn resolve(&self, reference: &str) -> Result<Mapping, String> {
            self.0
                .get(reference)
                .cloned()
                .ok_or_else(|| format!("no fragment named '{reference}'"))
        }
    }

    fn mapping(yaml: &str) -> Mapping {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        match Value::from_yaml(&value).unwrap() {
            Value::Map(map) => map,
            other => panic!("expected mapping, got {other:?}"),
        }
    }

    fn refs(entries: &[(&str, &str)]) -> Arc<dyn RefResolver> {
        Arc::new(MemoryRefs(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), mapping(v)))
                .collect(),
        ))
    }

    #[test]
    fn classifies_fields_sections_and_metadata() {
        let schema = Schema::compile(&mapping(
            r#"
description: Service configuration
name: { type: str }
server:
  description: Network settings
  required: false
  host: { type: str, required: false, default: localhost }
"#,
        ))
        .unwrap();
        let root = schema.root();
        assert_eq!(root.description(), "Service configuration");
        assert!(root.fields().contains_key("name"));
        let server = &root.subsections()["server"];
        assert!(!server.is_required());
        assert_eq!(server.description(), "Network settings");
        assert_eq!(server.fields()["host"].default(), Some(&Value::from("localhost")));
    }

    #[test]
    fn name_metadata_does_not_rename_the_section() {
        let schema = Schema::compile(&mapping(
            r#"
server:
  name: Network settings
  host: { type: str }
"#,
        ))
        .unwrap();
        let server = &schema.root().subsections()["server"];
        assert_eq!(server.name(), "server");
        assert_eq!(server.title(), Some("Network settings"));

        let err = schema
            .validate(&mapping("server: { host: h, port: 1 }"), true)
            .unwrap_err();
        assert_eq!(err.path(), &["server".to_string()]);
        assert_eq!(err.message(), "Unexpected key(s) in section 'server': port");
    }

    #[test]
    fn reserved_field_names_are_rejected() {
        let err = Schema::compile(&mapping("value_range: { type: int }")).unwrap_err();
        assert!(matches!(err, SchemaFormatError::ReservedName(_)));
        let err = Schema::compile(&mapping("s: { values: { type: str } }")).unwrap_err();
        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn scalar_entries_are_format_errors() {
        let err = Schema::compile(&mapping("port: 8080")).unwrap_err();
        assert!(matches!(err, SchemaFormatError::InvalidSection { .. }));
    }

    #[test]
    fn refs_merge_with_inline_override() {
        let compiler = SchemaCompiler::new().with_refs(refs(&[(
            "port.yaml",
            "type: int\nvalue_range: [1, 65535]\nrequired: false\ndefault: 80",
        )]));
        let schema = compiler
            .compile(&mapping("port: { $ref: port.yaml, default: 8080 }"))
            .unwrap();
        let port = &schema.root().fields()["port"];
        assert_eq!(port.default(), Some(&Value::Int(8080)));
    }

    #[test]
    fn refs_can_supply_sections() {
        let compiler = SchemaCompiler::new().with_refs(refs(&[
            ("db.yaml", "host: { type: str }\ncreds: { $ref: creds.yaml }"),
            ("creds.yaml", "user: { type: str }"),
        ]));
        let schema = compiler.compile(&mapping("db: { $ref: db.yaml }")).unwrap();
        let db = &schema.root().subsections()["db"];
        assert!(db.fields().contains_key("host"));
        assert!(db.subsections()["creds"].fields().contains_key("user"));
    }

    #[test]
    fn sibling_refs_to_same_fragment_are_not_cycles() {
        let compiler = SchemaCompiler::new()
            .with_refs(refs(&[("port.yaml", "type: int")]));
        let schema = compiler
            .compile(&mapping("a: { $ref: port.yaml }\nb: { $ref: port.yaml }"))
            .unwrap();
        assert_eq!(schema.root().fields().len(), 2);
    }

    #[test]
    fn cyclic_refs_are_detected() {
        let compiler = SchemaCompiler::new().with_refs(refs(&[
            ("a.yaml", "inner: { $ref: b.yaml }"),
            ("b.yaml", "again: { $ref: a.yaml }"),
        ]));
        let err = compiler.compile(&mapping("root: { $ref: a.yaml }")).unwrap_err();
        assert_eq!(
            err,
            SchemaFormatError::CyclicReference {
                chain: vec!["a.yaml".into(), "b.yaml".into(), "a.yaml".into()],
            }
        );
    }

    #[test]
    fn ref_depth_is_bounded() {
        let compiler = SchemaCompiler::new()
            .with_refs(refs(&[
                ("one.yaml", "$ref: two.yaml"),
                ("two.yaml", "type: int"),
            ]))
            .max_ref_depth(1);
        let err = compiler.compile(&mapping("x: { $ref: one.yaml }")).unwrap_err();
        assert!(err.to_string().contains("exceeds 1 levels"));
    }

    #[test]
    fn refs_without_resolver_fail() {
        let err = Schema::compile(&mapping("x: { $ref: other.yaml }")).unwrap_err();
        assert!(matches!(err, SchemaFormatError::Reference { .. }));
    }

    #[test]
    fn validate_value_root_forms() {
        let schema = Schema::compile(&mapping(
            "flag: { type: bool, required: false, default: true }",
        ))
        .unwrap();
        let result = schema.validate_value(&Value::Null, true).unwrap();
        assert_eq!(result.built["flag"], Value::Bool(true));
        assert!(schema.validate_value(&Value::Int(1), true).is_err());
    }
}
