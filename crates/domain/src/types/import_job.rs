//! Data-import job records (blob-store files and warehouse tables).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportJobStatus {
    Active,
    Inactive,
    Deleted,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileImportJob {
    pub id: String,
    pub job_id: String,
    pub job_status: ImportJobStatus,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub total_files_pending_count: u64,
    #[serde(default)]
    pub total_files_success_count: u64,
    #[serde(default)]
    pub total_files_failed_count: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableImportJob {
    pub id: String,
    pub job_id: String,
    pub job_status: ImportJobStatus,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub table_store: Option<String>,
    #[serde(default)]
    pub total_queries_pending_count: u64,
    #[serde(default)]
    pub total_queries_success_count: u64,
    #[serde(default)]
    pub total_queries_failed_count: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields supplied when creating a file import job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFileImportJob {
    /// `S3`, `GCS` or `Azure`
    pub blob_store: String,
    pub bucket_name: String,
    pub prefix: String,
    pub model_name: String,
    /// e.g. `classification`, `regression`, `generative`
    pub model_type: String,
    #[serde(default = "default_environment")]
    pub model_environment_name: String,
    /// Column mapping from file columns to model schema fields
    pub model_schema: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

fn default_environment() -> String {
    "production".to_string()
}
