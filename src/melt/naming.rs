//! Table name generation
//!
//! Field names become table identifiers by replacing every character outside
//! `[A-Za-z0-9]` with `_` and prefixing `t_` when the result does not start
//! with a letter.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static INVALID_TABLE_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^A-Za-z0-9]").unwrap()
});

/// Name used for the top-level table and for empty field names
pub const ROOT_TABLE: &str = "root";

/// Generate a valid table name from a field name
pub fn create_table_name(field_name: &str) -> String {
    if field_name.is_empty() {
        return ROOT_TABLE.to_string();
    }

    let name = INVALID_TABLE_CHARS.replace_all(field_name, "_");

    if name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        name.into_owned()
    } else {
        format!("t_{}", name)
    }
}

/// Name of the junction table holding the scalar array `field_name` of `parent_table`
pub fn junction_table_name(parent_table: &str, field_name: &str) -> String {
    create_table_name(&format!("{}_{}", parent_table, field_name))
}

/// Sorted keys of an object, each followed by a comma
pub fn object_signature(obj: &Map<String, Value>) -> String {
    let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
    keys.sort_unstable();

    let mut signature = String::new();
    for key in keys {
        signature.push_str(key);
        signature.push(',');
    }
    signature
}
