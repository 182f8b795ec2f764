//! # Keywords Subcommand
//!
//! Lists the configuration keywords of each field kind. These are reserved
//! and cannot be used as data field names.

use anyhow::{bail, Result};
use clap::Args;

use rty_schema::reserved::reserved_keywords_by_kind;

/// Arguments for the `rty keywords` subcommand.
#[derive(Args, Debug)]
pub struct KeywordsArgs {
    /// Only list keywords of this kind (e.g. `int`, `list`).
    #[arg(long)]
    pub kind: Option<String>,
}

/// Execute the keywords subcommand.
pub fn run_keywords(args: &KeywordsArgs) -> Result<u8> {
    print!("{}", keyword_table(args.kind.as_deref())?);
    Ok(0)
}

/// One line per kind: `kind: kw1, kw2, ...`.
pub fn keyword_table(kind: Option<&str>) -> Result<String> {
    let table = reserved_keywords_by_kind();
    if let Some(kind) = kind {
        if !table.contains_key(kind) {
            let known: Vec<&str> = table.keys().copied().collect();
            bail!("unknown field kind '{kind}' (known: {})", known.join(", "));
        }
    }
    let mut out = String::new();
    for (name, keywords) in &table {
        if kind.is_some_and(|k| k != *name) {
            continue;
        }
        let keywords: Vec<&str> = keywords.iter().copied().collect();
        out.push_str(&format!("{name}: {}\n", keywords.join(", ")));
    }
    Ok(out)
}
