//! Phoenix → Arize migration bookkeeping.
//!
//! A [`MigrationJob`] moves through `pending → running → {completed | partial
//! | failed}`. Per-type outcomes are appended as [`MigrationResult`]s and never
//! edited; the terminal status is derived from them in
//! [`MigrationJob::finalize`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ArizeError, Result};
use crate::impl_domain_status_conversions;

/// Category of Phoenix data copied by the migration engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Datasets,
    Prompts,
    Traces,
    Annotations,
    Evaluations,
}

impl_domain_status_conversions!(DataType {
    Datasets => "datasets",
    Prompts => "prompts",
    Traces => "traces",
    Annotations => "annotations",
    Evaluations => "evaluations",
});

impl DataType {
    /// Every category, in migration order.
    pub const ALL: [DataType; 5] = [
        DataType::Datasets,
        DataType::Prompts,
        DataType::Traces,
        DataType::Annotations,
        DataType::Evaluations,
    ];

    /// Pluralized key used both as the REST path segment and the response key.
    pub fn collection_key(self) -> &'static str {
        match self {
            Self::Datasets => "datasets",
            Self::Prompts => "prompts",
            Self::Traces => "traces",
            Self::Annotations => "annotations",
            Self::Evaluations => "evaluations",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationStatus {
    Pending,
    Running,
    Completed,
    Partial,
    Failed,
}

impl_domain_status_conversions!(MigrationStatus {
    Pending => "pending",
    Running => "running",
    Completed => "completed",
    Partial => "partial",
    Failed => "failed",
});

impl MigrationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Partial | Self::Failed)
    }
}

/// On-disk format for exported records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Parquet,
}

impl_domain_status_conversions!(ExportFormat {
    Json => "json",
    Csv => "csv",
    Parquet => "parquet",
});

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

/// Outcome of migrating one data type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationResult {
    pub data_type: DataType,
    pub success_count: u64,
    pub error_count: u64,
    pub skipped_count: u64,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub export_file: Option<PathBuf>,
    pub duration_seconds: f64,
}

impl MigrationResult {
    /// A result for a type whose export or import raised.
    pub fn failure(data_type: DataType, error: impl Into<String>, duration_seconds: f64) -> Self {
        Self {
            data_type,
            success_count: 0,
            error_count: 1,
            skipped_count: 0,
            errors: vec![error.into()],
            export_file: None,
            duration_seconds,
        }
    }

    /// A result for a type with no records in the source project.
    pub fn empty(data_type: DataType, duration_seconds: f64) -> Self {
        Self {
            data_type,
            success_count: 0,
            error_count: 0,
            skipped_count: 0,
            errors: Vec::new(),
            export_file: None,
            duration_seconds,
        }
    }
}

/// One end-to-end migration request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationJob {
    pub id: Uuid,
    pub project_name: String,
    pub data_types: Vec<DataType>,
    pub status: MigrationStatus,
    pub processed_records: u64,
    pub failed_records: u64,
    pub total_records: u64,
    pub results: Vec<MigrationResult>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl MigrationJob {
    pub fn new(project_name: impl Into<String>, data_types: Vec<DataType>) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_name: project_name.into(),
            data_types,
            status: MigrationStatus::Pending,
            processed_records: 0,
            failed_records: 0,
            total_records: 0,
            results: Vec::new(),
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// `pending → running`
    pub fn start(&mut self) -> Result<()> {
        if self.status != MigrationStatus::Pending {
            return Err(ArizeError::Validation(format!(
                "migration {} cannot start from status {}",
                self.id, self.status
            )));
        }
        self.status = MigrationStatus::Running;
        Ok(())
    }

    /// Append one data type's outcome and fold it into the counters.
    pub fn record(&mut self, result: MigrationResult) -> Result<()> {
        if self.status.is_terminal() {
            return Err(ArizeError::Validation(format!(
                "migration {} is {} and no longer accepts results",
                self.id, self.status
            )));
        }
        self.processed_records += result.success_count;
        self.failed_records += result.error_count;
        self.total_records += result.success_count + result.error_count + result.skipped_count;
        self.results.push(result);
        Ok(())
    }

    /// Derive the terminal status from the recorded results.
    ///
    /// No failures ⇒ `completed` (including a project with nothing to copy);
    /// failures with at least one success ⇒ `partial`; failures only ⇒
    /// `failed`.
    pub fn finalize(&mut self) -> MigrationStatus {
        if self.status.is_terminal() {
            return self.status;
        }
        let successes: u64 = self.results.iter().map(|r| r.success_count).sum();
        let failures: u64 = self.results.iter().map(|r| r.error_count).sum();

        self.status = if failures == 0 {
            MigrationStatus::Completed
        } else if successes > 0 {
            MigrationStatus::Partial
        } else {
            MigrationStatus::Failed
        };
        self.completed_at = Some(Utc::now());
        self.status
    }

    /// Mark a running job failed. In-flight work is not interrupted.
    pub fn cancel(&mut self) -> Result<()> {
        if self.status != MigrationStatus::Running {
            return Err(ArizeError::Validation(format!(
                "only running migrations can be cancelled (status: {})",
                self.status
            )));
        }
        self.status = MigrationStatus::Failed;
        self.completed_at = Some(Utc::now());
        Ok(())
    }
}

/// Narrowing applied while exporting from the source project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFilters {
    /// Only records created at or after this instant
    #[serde(default)]
    pub since: Option<DateTime<Utc>>,
    /// Only records created before this instant
    #[serde(default)]
    pub until: Option<DateTime<Utc>>,
    /// Stop after this many records, overriding the configured per-type cap
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Pre-flight estimate of what a migration would copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityReport {
    pub project_name: String,
    pub project_exists: bool,
    pub estimated_counts: BTreeMap<DataType, u64>,
    pub total_estimated: u64,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(data_type: DataType, success: u64, errors: u64) -> MigrationResult {
        MigrationResult {
            data_type,
            success_count: success,
            error_count: errors,
            skipped_count: 0,
            errors: Vec::new(),
            export_file: None,
            duration_seconds: 0.1,
        }
    }

    fn running_job() -> MigrationJob {
        let mut job = MigrationJob::new("demo", vec![DataType::Datasets, DataType::Prompts]);
        job.start().unwrap();
        job
    }

    #[test]
    fn all_types_succeeding_completes() {
        let mut job = running_job();
        job.record(result(DataType::Datasets, 10, 0)).unwrap();
        job.record(result(DataType::Prompts, 3, 0)).unwrap();

        assert_eq!(job.finalize(), MigrationStatus::Completed);
        assert_eq!(job.processed_records, 13);
        assert!(job.completed_at.is_some());
    }

    #[test]
    fn one_success_one_failure_is_partial() {
        let mut job = running_job();
        job.record(result(DataType::Datasets, 10, 0)).unwrap();
        job.record(MigrationResult::failure(DataType::Prompts, "boom", 0.0)).unwrap();

        assert_eq!(job.finalize(), MigrationStatus::Partial);
        assert_eq!(job.failed_records, 1);
    }

    #[test]
    fn all_failing_is_failed() {
        let mut job = running_job();
        job.record(MigrationResult::failure(DataType::Datasets, "a", 0.0)).unwrap();
        job.record(MigrationResult::failure(DataType::Prompts, "b", 0.0)).unwrap();

        assert_eq!(job.finalize(), MigrationStatus::Failed);
    }

    #[test]
    fn terminal_job_rejects_results() {
        let mut job = running_job();
        job.finalize();
        assert!(job.record(result(DataType::Traces, 1, 0)).is_err());
    }

    #[test]
    fn cancel_only_from_running() {
        let mut pending = MigrationJob::new("demo", vec![DataType::Traces]);
        assert!(pending.cancel().is_err());

        let mut job = running_job();
        job.cancel().unwrap();
        assert_eq!(job.status, MigrationStatus::Failed);
        assert!(job.completed_at.is_some());
        assert_eq!(job.finalize(), MigrationStatus::Failed);
    }

    #[test]
    fn job_serializes_timestamps_as_iso8601() {
        let job = MigrationJob::new("demo", vec![DataType::Annotations]);
        let value = serde_json::to_value(&job).unwrap();
        let created = value["created_at"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(created).is_ok());
        assert_eq!(value["status"], "pending");
        assert_eq!(value["data_types"][0], "annotations");
    }
}
