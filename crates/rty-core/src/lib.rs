//! # rty-core — Foundational Types for rty
//!
//! Leaf crate of the workspace. Defines the document value model shared by
//! schema definitions, input documents and validation output, plus the two
//! error kinds every other crate reports through.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `rty-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod value;

pub use error::{RtyError, SchemaFormatError, ValidationError};
pub use value::{Instance, Mapping, Value, TYPE_SENTINEL};
