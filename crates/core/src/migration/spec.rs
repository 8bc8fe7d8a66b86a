//! Per-data-type import rules.

use arize_domain::DataType;
use serde_json::Value;

const TRACE_FIELDS: &[&str] = &["trace_id"];
const ANNOTATION_REQUIRED: &[&str] = &["span_id", "annotation_name"];
const ANNOTATION_DEDUP: &[&str] = &["span_id", "annotation_name", "created_at"];
const EVALUATION_REQUIRED: &[&str] = &["span_id", "name"];
const EVALUATION_DEDUP: &[&str] = &["span_id", "name", "created_at"];

/// Which fields an item must carry, and which identify it for dedup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSpec {
    pub data_type: DataType,
    pub required_fields: &'static [&'static str],
    pub dedup_fields: &'static [&'static str],
}

impl ImportSpec {
    pub fn for_data_type(data_type: DataType) -> Self {
        const NAMED: &[&str] = &["name"];
        const NAMED_BY_ID: &[&str] = &["id", "name"];

        let (required_fields, dedup_fields): (&'static [&'static str], &'static [&'static str]) =
            match data_type {
                DataType::Datasets | DataType::Prompts => (NAMED, NAMED_BY_ID),
                DataType::Traces => (TRACE_FIELDS, TRACE_FIELDS),
                DataType::Annotations => (ANNOTATION_REQUIRED, ANNOTATION_DEDUP),
                DataType::Evaluations => (EVALUATION_REQUIRED, EVALUATION_DEDUP),
            };
        Self { data_type, required_fields, dedup_fields }
    }

    /// First required field that is absent or null.
    pub fn missing_required(&self, item: &Value) -> Option<&'static str> {
        self.required_fields
            .iter()
            .copied()
            .find(|field| item.get(*field).map_or(true, Value::is_null))
    }
}
