//! In-memory duplicate suppression for one importer.

use std::collections::HashSet;

use arize_common::content_hash;
use serde_json::Value;

/// Content hashes of records already imported by one importer instance.
///
/// State lives only as long as the tracker; a fresh process starts empty.
#[derive(Debug, Default, Clone)]
pub struct DuplicateTracker {
    seen: HashSet<String>,
}

impl DuplicateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hash(item: &Value, fields: &[&str]) -> String {
        content_hash(item, fields)
    }

    pub fn is_duplicate(&self, hash: &str) -> bool {
        self.seen.contains(hash)
    }

    /// Returns `false` if the hash was already marked.
    pub fn mark_imported(&mut self, hash: String) -> bool {
        self.seen.insert(hash)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn reset(&mut self) {
        self.seen.clear();
    }
}
