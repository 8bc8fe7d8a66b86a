//! Migration orchestration
//!
//! Runs export then import for each requested data type in order. A type
//! that fails is recorded as a one-error result and the loop moves on; the
//! job's terminal status is derived from all results once the loop ends.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use arize_core::{MigrationTarget, PhoenixSource};
use arize_domain::constants::{EXPORT_ROOT_DIR, MIGRATION_RESULTS_FILE};
use arize_domain::{
    ArizeError, DataType, ExportFilters, FeasibilityReport, MigrationConfig, MigrationJob, MigrationResult,
    Result,
};
use chrono::Utc;
use tracing::{error, info, instrument, warn};

use super::exporter::Exporter;
use super::importer::Importer;
use crate::errors::conversions::to_domain;

/// Reads from one Phoenix source; the Arize target is supplied per run so
/// feasibility checks need no Arize credentials.
pub struct MigrationService {
    source: Arc<dyn PhoenixSource>,
    config: MigrationConfig,
    exporter: Exporter,
}

impl MigrationService {
    pub fn new(source: Arc<dyn PhoenixSource>, config: MigrationConfig) -> Result<Self> {
        config.validate()?;
        let exporter = Exporter::new(Arc::clone(&source), config.clone());
        Ok(Self { source, config, exporter })
    }

    /// Replace the exporter (e.g. to change its retry policy).
    pub fn with_exporter(mut self, exporter: Exporter) -> Self {
        self.exporter = exporter;
        self
    }

    /// Estimate what a migration would copy. Estimation failures never fail
    /// the report; they show up as zero counts.
    #[instrument(skip(self))]
    pub async fn check_feasibility(
        &self,
        project: &str,
        data_types: &[DataType],
    ) -> Result<FeasibilityReport> {
        let mut warnings = Vec::new();
        let project_exists = match self.source.get_project(project).await {
            Ok(found) => found.is_some(),
            Err(err) => {
                warnings.push(format!("could not look up project '{project}': {err}"));
                false
            }
        };
        if !project_exists {
            warnings.push(format!("project '{project}' was not found on the Phoenix server"));
        }

        let mut estimated_counts = BTreeMap::new();
        for &data_type in data_types {
            let count = if project_exists { self.exporter.estimate_count(project, data_type).await } else { 0 };
            estimated_counts.insert(data_type, count);
        }
        let total_estimated = estimated_counts.values().sum();
        if project_exists && total_estimated == 0 {
            warnings.push("no records found for the requested data types".to_string());
        }

        Ok(FeasibilityReport {
            project_name: project.to_string(),
            project_exists,
            estimated_counts,
            total_estimated,
            warnings,
        })
    }

    /// `<output_dir>/phoenix_export/<project>/<timestamp>/`
    ///
    /// The project name must be a single path component.
    pub fn run_directory(output_dir: &Path, project: &str) -> Result<PathBuf> {
        let trimmed = project.trim();
        if trimmed.is_empty() || trimmed == "." || trimmed == ".." || project.contains(['/', '\\']) {
            return Err(ArizeError::Validation(format!(
                "project name '{project}' cannot be used as a directory name"
            )));
        }
        Ok(output_dir
            .join(EXPORT_ROOT_DIR)
            .join(project)
            .join(Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string()))
    }

    /// Migrate `data_types` of `project` into `target`, writing exports and
    /// `migration_results.json` under a fresh run directory.
    #[instrument(skip(self, target, output_dir, filters))]
    pub async fn run(
        &self,
        target: Arc<dyn MigrationTarget>,
        project: &str,
        data_types: &[DataType],
        output_dir: &Path,
        filters: &ExportFilters,
    ) -> Result<MigrationJob> {
        let run_dir = Self::run_directory(output_dir, project)?;
        tokio::fs::create_dir_all(&run_dir).await.map_err(to_domain)?;

        let mut job = MigrationJob::new(project, data_types.to_vec());
        job.start()?;
        info!(job_id = %job.id, run_dir = %run_dir.display(), "migration started");

        for &data_type in data_types {
            let started = Instant::now();
            let step = self.migrate_type(&target, project, data_type, &run_dir, filters, started);
            let result = match step.await {
                Ok(result) => result,
                Err(err) => {
                    error!(data_type = %data_type, error = %err, "data type failed");
                    MigrationResult::failure(data_type, err.to_string(), started.elapsed().as_secs_f64())
                }
            };
            job.record(result)?;
        }

        let status = job.finalize();
        let results_path = run_dir.join(MIGRATION_RESULTS_FILE);
        tokio::fs::write(&results_path, serde_json::to_vec_pretty(&job)?).await.map_err(to_domain)?;

        info!(
            job_id = %job.id,
            status = %status,
            processed = job.processed_records,
            failed = job.failed_records,
            "migration finished"
        );
        Ok(job)
    }

    async fn migrate_type(
        &self,
        target: &Arc<dyn MigrationTarget>,
        project: &str,
        data_type: DataType,
        run_dir: &Path,
        filters: &ExportFilters,
        started: Instant,
    ) -> Result<MigrationResult> {
        let Some(export_file) = self.exporter.export(project, data_type, run_dir, filters).await? else {
            return Ok(MigrationResult::empty(data_type, started.elapsed().as_secs_f64()));
        };

        let mut importer = Importer::new(Arc::clone(target), data_type, self.config.clone());
        let summary = importer.import_data(&export_file, project).await?;
        if summary.error_count > 0 {
            warn!(data_type = %data_type, errors = summary.error_count, "records failed to import");
        }

        Ok(MigrationResult {
            data_type,
            success_count: summary.success_count,
            error_count: summary.error_count,
            skipped_count: summary.skipped_count,
            errors: summary.errors,
            export_file: Some(export_file),
            duration_seconds: started.elapsed().as_secs_f64(),
        })
    }
}
