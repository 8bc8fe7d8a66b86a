//! Stable content hashing for duplicate suppression.
//!
//! A record's identity is derived from a declared subset of its top-level
//! fields, so two exports of the same logical record hash identically even
//! when unrelated fields (timestamps of the export itself, ordering of extra
//! keys) differ.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Field separator that cannot appear in a rendered JSON scalar.
const FIELD_SEPARATOR: char = '\u{1f}';

/// Render a single field of `item` as the string fed into the hash.
///
/// Strings are used verbatim (no surrounding quotes), absent fields and
/// `null` both render as the empty string, and every other value uses its
/// compact JSON form.
pub fn field_value_string(item: &Value, field: &str) -> String {
    match item.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Compute a hex-encoded SHA-256 digest over `fields` of `item`.
///
/// Field names participate in the digest, so `{a: "x"}` hashed over `[a, b]`
/// differs from `{b: "x"}` hashed over the same list.
pub fn content_hash(item: &Value, fields: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            hasher.update(FIELD_SEPARATOR.to_string().as_bytes());
        }
        hasher.update(field.as_bytes());
        hasher.update(b"=");
        hasher.update(field_value_string(item, field).as_bytes());
    }
    hex::encode(hasher.finalize())
}
