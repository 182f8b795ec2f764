//! # rty-schema — Schema Language and Validation Engine
//!
//! Compiles schema definitions written in a small type-expression language
//! (`int`, `list[str]`, `tuple(int, str)`, `int | None`, `object[geo.Point]`)
//! into a tree of field validators, and validates documents against it.
//!
//! ## Architecture
//!
//! - [`typeexpr`]: parses type expressions into [`FieldSpec`] values.
//! - [`registry`]: the primitive keyword table and [`FieldFactory`].
//! - [`field`]: the field kinds and two-phase field construction.
//! - [`object`]: the external type capability behind object fields.
//! - [`reserved`]: keywords that may not be used as field names.
//! - [`section`] / [`schema`]: the section tree, `$ref` composition and
//!   the [`SchemaCompiler`] builder.
//! - [`loader`]: file loading, document validation from disk, and writing
//!   defaulted views.
//!
//! ## Example
//!
//! ```
//! use rty_core::{Mapping, Value};
//! use rty_schema::Schema;
//!
//! let definition: serde_yaml::Value = serde_yaml::from_str(
//!     "name: { type: str }\nenabled: { type: bool, required: false, default: false }",
//! ).unwrap();
//! let Value::Map(definition) = Value::from_yaml(&definition).unwrap() else { unreachable!() };
//! let schema = Schema::compile(&definition).unwrap();
//!
//! let mut doc = Mapping::new();
//! doc.insert("name".into(), "x".into());
//! let result = schema.validate(&doc, true).unwrap();
//! assert_eq!(result.built["enabled"], Value::Bool(false));
//! ```
//!
//! ## Crate Policy
//!
//! - Compiled schemas are immutable; validation holds no shared state.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.

pub mod config;
pub mod field;
pub mod loader;
pub mod object;
pub mod registry;
pub mod reserved;
pub mod schema;
pub mod section;
pub mod typeexpr;

pub use config::FieldConfig;
pub use field::{Field, FieldKind, ValidateAndBuild};
pub use loader::{load_schema, validate_file, write_defaulted, FileRefResolver, LoadError};
pub use object::{FnObjectType, ObjectType, Param, TypeRegistry, TypeResolver};
pub use registry::{FieldFactory, PrimitiveKind};
pub use schema::{RefResolver, Schema, SchemaCompiler};
pub use section::{Section, Validated};
pub use typeexpr::{FieldSpec, ObjectTarget};
