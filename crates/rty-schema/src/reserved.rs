//! Reserved keywords: configuration keys of the field kinds, which may not be
//! used as data field names.

use std::collections::{BTreeMap, BTreeSet};

use rty_core::SchemaFormatError;

use crate::registry::{COMMON_KEYWORDS, KIND_KEYWORDS};

/// Keywords per field kind, common keys included.
pub fn reserved_keywords_by_kind() -> BTreeMap<&'static str, BTreeSet<&'static str>> {
    KIND_KEYWORDS
        .iter()
        .map(|(kind, keywords)| {
            let set: BTreeSet<&'static str> = COMMON_KEYWORDS.iter().chain(keywords.iter()).copied().collect();
            (*kind, set)
        })
        .collect()
}

/// Every reserved keyword across all kinds.
pub fn all_reserved_keywords() -> BTreeSet<&'static str> {
    KIND_KEYWORDS
        .iter()
        .flat_map(|(_, keywords)| keywords.iter())
        .chain(COMMON_KEYWORDS.iter())
        .copied()
        .collect()
}

/// Fail if `name` collides with a reserved keyword.
pub fn check_field_name(name: &str) -> Result<(), SchemaFormatError> {
    if all_reserved_keywords().contains(name) {
        Err(SchemaFormatError::ReservedName(name.to_string()))
    } else {
        Ok(())
    }
}
