//! # File Loading
//!
//! Reads schema and document files from disk and writes defaulted views
//! back. Schemas are YAML; documents are YAML, or JSON when the file has a
//! `.json` extension. `$ref` paths inside a schema are resolved relative to
//! a base directory by [`FileRefResolver`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rty_core::{Mapping, SchemaFormatError, ValidationError, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::schema::{RefResolver, Schema, SchemaCompiler};
use crate::section::Validated;

/// Errors from loading, compiling and validating files.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The schema file could not be read or parsed.
    #[error("schema load error for '{path}': {reason}")]
    SchemaLoadError {
        /// Path to the schema file.
        path: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// The document file could not be read or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoadError {
        /// Path to the document.
        path: String,
        /// Reason the document could not be loaded.
        reason: String,
    },

    /// The schema definition is malformed.
    #[error("invalid schema '{path}': {source}")]
    Format {
        /// Path to the schema file.
        path: String,
        #[source]
        source: SchemaFormatError,
    },

    /// The document does not conform to the schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The defaulted view could not be written.
    #[error("cannot write '{path}': {reason}")]
    WriteError {
        /// Destination path.
        path: String,
        /// Reason the write failed.
        reason: String,
    },
}

/// Resolves `$ref` values as file paths relative to a base directory.
#[derive(Debug, Clone)]
pub struct FileRefResolver {
    base_dir: PathBuf,
}

impl FileRefResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn path_of(&self, reference: &str) -> PathBuf {
        let path = Path::new(reference);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl RefResolver for FileRefResolver {
    fn resolve(&self, reference: &str) -> Result<Mapping, String> {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return Err("remote references are not supported".to_string());
        }
        let path = self.path_of(reference);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        parse_yaml_mapping(&content)
    }

    fn identity(&self, reference: &str) -> String {
        let path = self.path_of(reference);
        std::fs::canonicalize(&path)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

fn parse_yaml_mapping(content: &str) -> Result<Mapping, String> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| format!("invalid YAML: {e}"))?;
    match Value::from_yaml(&yaml)? {
        Value::Map(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        other => Err(format!("expected a mapping at the top level, got {}", other.type_name())),
    }
}

/// Read a YAML file whose top level is a mapping. An empty file is an
/// empty mapping.
pub fn load_yaml_mapping(path: &Path) -> Result<Mapping, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| LoadError::DocumentLoadError {
        path: path.display().to_string(),
        reason: format!("cannot read file: {e}"),
    })?;
    parse_yaml_mapping(&content).map_err(|reason| LoadError::DocumentLoadError {
        path: path.display().to_string(),
        reason,
    })
}

/// Load and compile a schema file.
///
/// `$ref` paths resolve against `base_dir`, or the schema file's directory
/// when `None`.
pub fn load_schema(path: &Path, base_dir: Option<&Path>) -> Result<Schema, LoadError> {
    load_schema_with(path, base_dir, SchemaCompiler::new())
}

/// [`load_schema`] with a preconfigured compiler (for example one carrying
/// object types). The compiler's `$ref` resolver is replaced by a
/// [`FileRefResolver`].
pub fn load_schema_with(
    path: &Path,
    base_dir: Option<&Path>,
    compiler: SchemaCompiler,
) -> Result<Schema, LoadError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| LoadError::SchemaLoadError {
        path: display.clone(),
        reason: format!("cannot read file: {e}"),
    })?;
    let definition = parse_yaml_mapping(&content).map_err(|reason| LoadError::SchemaLoadError {
        path: display.clone(),
        reason,
    })?;

    let base_dir = match base_dir {
        Some(dir) => dir.to_path_buf(),
        None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let schema_path = display.as_str();
    debug!(schema = %schema_path, base_dir = %base_dir.display(), "compiling schema file");

    let compiler = compiler.with_refs(Arc::new(FileRefResolver::new(base_dir)));
    compiler
        .compile(&definition)
        .map_err(|source| LoadError::Format {
            path: display,
            source,
        })
}

/// Load a document (YAML, or JSON by extension).
pub fn load_document(path: &Path) -> Result<Value, LoadError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| LoadError::DocumentLoadError {
        path: display.clone(),
        reason: format!("cannot read file: {e}"),
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "json" => {
            let json: serde_json::Value =
                serde_json::from_str(&content).map_err(|e| LoadError::DocumentLoadError {
                    path: display.clone(),
                    reason: format!("invalid JSON: {e}"),
                })?;
            Ok(Value::from_json(&json))
        }
        _ => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(&content).map_err(|e| LoadError::DocumentLoadError {
                    path: display.clone(),
                    reason: format!("invalid YAML: {e}"),
                })?;
            Value::from_yaml(&yaml).map_err(|reason| LoadError::DocumentLoadError {
                path: display,
                reason,
            })
        }
    }
}

/// Validate a document file against a compiled schema.
pub fn validate_file(schema: &Schema, path: &Path, strict: bool) -> Result<Validated, LoadError> {
    let document = load_document(path)?;
    let result = schema.validate_value(&document, strict)?;
    info!(document = %path.display(), strict, "document is valid");
    Ok(result)
}

/// Write a mapping (typically the defaulted view) as YAML.
pub fn write_defaulted(path: &Path, mapping: &Mapping) -> Result<(), LoadError> {
    let write_error = |reason: String| LoadError::WriteError {
        path: path.display().to_string(),
        reason,
    };
    let text = serde_yaml::to_string(mapping).map_err(|e| write_error(e.to_string()))?;
    std::fs::write(path, text).map_err(|e| write_error(e.to_string()))?;
    debug!(path = %path.display(), "wrote defaulted document");
    Ok(())
}
