//! # rty-cli — Command-Line Interface for rty
//!
//! Provides the `rty` binary.
//!
//! ## Subcommands
//!
//! - `rty validate` — Validate a document against a schema and print the
//!   built values.
//! - `rty check` — Compile a schema and print its field tree.
//! - `rty keywords` — List the configuration keywords of every field kind.
//!
//! ```bash
//! rty validate --schema schema.yaml --config service.yaml --strict
//! rty validate --schema schema.yaml --config service.yaml --write-defaults out.yaml
//! rty check --schema schema.yaml
//! rty keywords --kind str
//! ```

pub mod check;
pub mod keywords;
pub mod validate;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

/// Output format for printed documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Render a serializable value in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(value).context("failed to render YAML"),
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).context("failed to render JSON")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rty_core::{Mapping, Value};

    #[test]
    fn render_formats() {
        let mut map = Mapping::new();
        map.insert("pair".into(), Value::Tuple(vec![Value::Int(1), "a".into()]));
        map.insert("n".into(), Value::Int(2));

        let yaml = render(&map, OutputFormat::Yaml).unwrap();
        let parsed: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed["pair"].as_str(), Some("(1, 'a')"));
        assert_eq!(parsed["n"].as_i64(), Some(2));

        let json = render(&map, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["n"], 2);
        assert_eq!(parsed["pair"], "(1, 'a')");
    }
}
