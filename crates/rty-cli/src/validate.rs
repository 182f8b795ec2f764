//! # Validate Subcommand
//!
//! Compiles a schema file, validates one document against it, and prints
//! the built values. Optionally writes the defaulted view of the document.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use rty_schema::loader::{load_schema, validate_file, write_defaulted, LoadError};

use crate::{render, OutputFormat};

/// Arguments for the `rty validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema definition file (YAML).
    #[arg(long, value_name = "PATH")]
    pub schema: PathBuf,

    /// Document to validate (YAML, or JSON by extension).
    #[arg(long, value_name = "PATH")]
    pub config: PathBuf,

    /// Reject keys the schema does not declare.
    #[arg(long)]
    pub strict: bool,

    /// Directory `$ref` paths are resolved against. Defaults to the
    /// schema file's directory.
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Write the document with defaults filled in to this path.
    #[arg(long, value_name = "PATH")]
    pub write_defaults: Option<PathBuf>,

    /// Output format for the built values.
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when the document is valid, 1 when it is not.
/// Schema and file errors are returned as `Err`.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let schema = load_schema(&args.schema, args.base_dir.as_deref())
        .with_context(|| format!("failed to load schema {}", args.schema.display()))?;

    let result = match validate_file(&schema, &args.config, args.strict) {
        Ok(result) => result,
        Err(LoadError::Validation(e)) => {
            println!("FAIL: {}: {}", e.path_string(), e.message());
            return Ok(1);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to validate {}", args.config.display()))
        }
    };

    if let Some(path) = &args.write_defaults {
        write_defaulted(path, &result.defaulted)?;
        tracing::info!(path = %path.display(), "wrote defaulted document");
    }

    print!("{}", render(&result.built, args.format)?);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn args(schema: PathBuf, config: PathBuf) -> ValidateArgs {
        ValidateArgs {
            schema,
            config,
            strict: true,
            base_dir: None,
            write_defaults: None,
            format: OutputFormat::Yaml,
        }
    }

    const SCHEMA: &str = "name: { type: str }\nport: { type: int, required: false, default: 8080 }\n";

    #[test]
    fn valid_document_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(dir.path(), "schema.yaml", SCHEMA);
        let config = write(dir.path(), "doc.yaml", "name: api\n");
        assert_eq!(run_validate(&args(schema, config)).unwrap(), 0);
    }

    #[test]
    fn invalid_document_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(dir.path(), "schema.yaml", SCHEMA);
        let config = write(dir.path(), "doc.yaml", "name: api\nport: http\n");
        assert_eq!(run_validate(&args(schema.clone(), config)).unwrap(), 1);

        let config = write(dir.path(), "extra.yaml", "name: api\nhost: h\n");
        assert_eq!(run_validate(&args(schema, config)).unwrap(), 1);
    }

    #[test]
    fn non_strict_accepts_extra_keys() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(dir.path(), "schema.yaml", SCHEMA);
        let config = write(dir.path(), "doc.yaml", "name: api\nhost: h\n");
        let mut args = args(schema, config);
        args.strict = false;
        assert_eq!(run_validate(&args).unwrap(), 0);
    }

    #[test]
    fn writes_defaulted_document() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(dir.path(), "schema.yaml", SCHEMA);
        let config = write(dir.path(), "doc.yaml", "name: api\n");
        let out = dir.path().join("out.yaml");
        let mut args = args(schema, config);
        args.write_defaults = Some(out.clone());
        assert_eq!(run_validate(&args).unwrap(), 0);

        let written = fs::read_to_string(&out).unwrap();
        assert!(written.contains("port: 8080"), "{written}");
        assert!(written.contains("name: api"), "{written}");
    }

    #[test]
    fn broken_schema_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(dir.path(), "schema.yaml", "x: { type: 'list[int)' }\n");
        let config = write(dir.path(), "doc.yaml", "x: [1]\n");
        let err = run_validate(&args(schema, config)).unwrap_err();
        assert!(format!("{err:#}").contains("mismatched brackets"), "{err:#}");
    }

    #[test]
    fn missing_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(dir.path(), "schema.yaml", SCHEMA);
        assert!(run_validate(&args(schema, dir.path().join("missing.yaml"))).is_err());
    }
}
