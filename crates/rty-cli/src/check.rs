//! # Check Subcommand
//!
//! Compiles a schema file and prints its section and field tree with each
//! field's canonical type expression.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use rty_schema::loader::load_schema;
use rty_schema::{Schema, Section};

/// Arguments for the `rty check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema definition file (YAML).
    #[arg(long, value_name = "PATH")]
    pub schema: PathBuf,

    /// Directory `$ref` paths are resolved against.
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let schema = load_schema(&args.schema, args.base_dir.as_deref())
        .with_context(|| format!("failed to load schema {}", args.schema.display()))?;
    print!("{}", describe(&schema));
    println!("OK: {}", args.schema.display());
    Ok(0)
}

/// Indented tree of sections and fields.
pub fn describe(schema: &Schema) -> String {
    let mut out = String::new();
    describe_section(&mut out, schema.root(), 0);
    out
}

fn describe_section(out: &mut String, section: &Section, depth: usize) {
    let indent = "  ".repeat(depth);
    for (key, field) in section.fields() {
        out.push_str(&format!("{indent}{key}: {}", field.type_expr()));
        match field.default() {
            Some(default) => out.push_str(&format!(" = {}", default.literal())),
            None => out.push_str(" (required)"),
        }
        if !field.description().is_empty() {
            out.push_str(&format!("  # {}", field.description()));
        }
        out.push('\n');
    }
    for (key, subsection) in section.subsections() {
        out.push_str(&format!("{indent}{key}/"));
        if !subsection.is_required() {
            out.push_str(" (optional)");
        }
        if !subsection.description().is_empty() {
            out.push_str(&format!("  # {}", subsection.description()));
        }
        out.push('\n');
        describe_section(out, subsection, depth + 1);
    }
}
