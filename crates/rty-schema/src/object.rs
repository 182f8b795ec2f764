//! # Object Types
//!
//! Object fields delegate construction to externally registered types.
//! A type is described by an [`ObjectType`]: its fully-qualified path, the
//! named parameters its constructor takes (each optionally typed by a type
//! expression and optionally defaulted), and a constructor over the
//! validated argument mapping.
//!
//! Types are looked up through the [`TypeResolver`] capability, injected
//! into the compiler. [`TypeRegistry`] is the in-memory implementation;
//! [`FnObjectType`] builds a type from a closure.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rty_core::{Mapping, Value};

/// Type-erased constructed object.
pub type Payload = Arc<dyn Any + Send + Sync>;

/// A constructor parameter of an object type.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    /// Type expression the argument is validated against. Untyped
    /// parameters accept any value unchanged.
    pub type_expr: Option<String>,
    /// Default applied when the argument is absent. `None` makes the
    /// parameter required.
    pub default: Option<Value>,
}

impl Param {
    /// Untyped, required.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_expr: None,
            default: None,
        }
    }

    /// Untyped, defaulted.
    pub fn optional(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            type_expr: None,
            default: Some(default.into()),
        }
    }

    /// Attach a type expression.
    pub fn typed(mut self, type_expr: impl Into<String>) -> Self {
        self.type_expr = Some(type_expr.into());
        self
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// An externally constructible type.
pub trait ObjectType: Send + Sync {
    /// Fully-qualified path, e.g. `geometry.Point`.
    fn type_path(&self) -> &str;

    /// Declared constructor parameters, in order.
    fn params(&self) -> &[Param];

    /// Whether the constructor takes arbitrary extra keyword arguments.
    fn accepts_extra(&self) -> bool {
        false
    }

    /// Build the object from validated, defaulted arguments.
    fn construct(&self, args: &Mapping) -> Result<Payload, String>;
}

/// Looks up object types by path.
pub trait TypeResolver: Send + Sync {
    fn resolve(&self, path: &str) -> Option<Arc<dyn ObjectType>>;
}

/// In-memory [`TypeResolver`].
#[derive(Default, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, Arc<dyn ObjectType>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type under its own path, replacing any previous entry.
    pub fn register(&mut self, ty: impl ObjectType + 'static) -> &mut Self {
        let ty: Arc<dyn ObjectType> = Arc::new(ty);
        self.types.insert(ty.type_path().to_string(), ty);
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, ty: impl ObjectType + 'static) -> Self {
        self.register(ty);
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeResolver for TypeRegistry {
    fn resolve(&self, path: &str) -> Option<Arc<dyn ObjectType>> {
        self.types.get(path).cloned()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut paths: Vec<&String> = self.types.keys().collect();
        paths.sort();
        f.debug_struct("TypeRegistry").field("types", &paths).finish()
    }
}

type Constructor = dyn Fn(&Mapping) -> Result<Payload, String> + Send + Sync;

/// [`ObjectType`] backed by a closure.
///
/// ```
/// use rty_schema::object::{FnObjectType, Param};
///
/// let point = FnObjectType::new("geometry.Point", |args| {
///     let x = args.get("x").cloned();
///     Ok(std::sync::Arc::new(x))
/// })
/// .param(Param::required("x").typed("int"))
/// .param(Param::optional("y", 0).typed("int"));
/// assert_eq!(point.params_len(), 2);
/// ```
pub struct FnObjectType {
    type_path: String,
    params: Vec<Param>,
    accepts_extra: bool,
    constructor: Arc<Constructor>,
}

impl FnObjectType {
    pub fn new<F>(type_path: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(&Mapping) -> Result<Payload, String> + Send + Sync + 'static,
    {
        Self {
            type_path: type_path.into(),
            params: Vec::new(),
            accepts_extra: false,
            constructor: Arc::new(constructor),
        }
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Accept arguments beyond the declared parameters.
    pub fn with_extra(mut self) -> Self {
        self.accepts_extra = true;
        self
    }

    pub fn params_len(&self) -> usize {
        self.params.len()
    }
}

impl ObjectType for FnObjectType {
    fn type_path(&self) -> &str {
        &self.type_path
    }

    fn params(&self) -> &[Param] {
        &self.params
    }

    fn accepts_extra(&self) -> bool {
        self.accepts_extra
    }

    fn construct(&self, args: &Mapping) -> Result<Payload, String> {
        (self.constructor)(args)
    }
}

impl fmt::Debug for FnObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnObjectType")
            .field("type_path", &self.type_path)
            .field("params", &self.params)
            .field("accepts_extra", &self.accepts_extra)
            .finish_non_exhaustive()
    }
}
