//! Arize import
//!
//! Replays an export file into a [`MigrationTarget`] in fixed-size batches.
//! Each item is checked for required fields, then for duplicates, then sent
//! with retry. Validation and authentication failures are never retried. A
//! failing item is counted and its siblings carry on; an authentication
//! failure abandons the rest of its batch, which is then counted as failed in
//! full. Only imported items are marked in the duplicate tracker, so a repeat
//! of a failed item is attempted again.

use std::path::Path;
use std::sync::Arc;

use arize_common::{retry_operation_if, RetryConfig};
use arize_core::{DuplicateTracker, ImportSpec, MigrationTarget};
use arize_domain::{ArizeError, DataType, MigrationConfig, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::formats;
use crate::errors::conversions::to_domain;

/// Aggregate outcome of one import call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub success_count: u64,
    pub error_count: u64,
    pub skipped_count: u64,
    pub errors: Vec<String>,
}

impl ImportSummary {
    fn absorb(&mut self, other: ImportSummary) {
        self.success_count += other.success_count;
        self.error_count += other.error_count;
        self.skipped_count += other.skipped_count;
        self.errors.extend(other.errors);
    }

    fn fail(&mut self, message: String) {
        self.error_count += 1;
        self.errors.push(message);
    }
}

pub struct Importer {
    target: Arc<dyn MigrationTarget>,
    spec: ImportSpec,
    config: MigrationConfig,
    retry: RetryConfig,
    tracker: DuplicateTracker,
}

impl Importer {
    pub fn new(target: Arc<dyn MigrationTarget>, data_type: DataType, config: MigrationConfig) -> Self {
        let retry = RetryConfig::exponential(config.max_retries, config.retry_delay());
        Self {
            target,
            spec: ImportSpec::for_data_type(data_type),
            config,
            retry,
            tracker: DuplicateTracker::new(),
        }
    }

    pub fn with_spec(mut self, spec: ImportSpec) -> Self {
        self.spec = spec;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn data_type(&self) -> DataType {
        self.spec.data_type
    }

    /// Hashes of records imported by this importer so far.
    pub fn tracker(&self) -> &DuplicateTracker {
        &self.tracker
    }

    /// Forget every imported hash.
    pub fn reset(&mut self) {
        self.tracker.reset();
    }

    /// Read an export file; the format follows the extension.
    pub async fn load_export_data(path: &Path) -> Result<Vec<Value>> {
        let format = formats::format_for_path(path)?;
        let bytes = tokio::fs::read(path).await.map_err(to_domain)?;
        formats::decode(format, &bytes)
    }

    /// Import every record of `export_file` into `project`.
    ///
    /// Fails only when the file cannot be read; item and batch failures are
    /// reported in the summary.
    #[instrument(skip(self, export_file), fields(data_type = %self.spec.data_type, file = %export_file.display()))]
    pub async fn import_data(&mut self, export_file: &Path, project: &str) -> Result<ImportSummary> {
        let items = Self::load_export_data(export_file).await?;
        Ok(self.import_items(&items, project).await)
    }

    pub async fn import_items(&mut self, items: &[Value], project: &str) -> ImportSummary {
        let batch_size = self.config.batch_size.max(1);
        let batch_count = items.len().div_ceil(batch_size);
        let mut summary = ImportSummary::default();

        for (index, batch) in items.chunks(batch_size).enumerate() {
            if index > 0 && self.config.batch_delay_ms > 0 {
                tokio::time::sleep(self.config.batch_delay()).await;
            }
            let offset = index * batch_size;
            match self.import_batch(batch, offset, project).await {
                Ok(batch_summary) => summary.absorb(batch_summary),
                Err(err) => {
                    warn!(batch = index + 1, size = batch.len(), error = %err, "batch failed");
                    summary.error_count += batch.len() as u64;
                    summary.errors.push(format!("batch {} of {batch_count} failed: {err}", index + 1));
                }
            }
        }

        info!(
            data_type = %self.spec.data_type,
            success = summary.success_count,
            errors = summary.error_count,
            skipped = summary.skipped_count,
            "import finished"
        );
        summary
    }

    async fn import_batch(&mut self, batch: &[Value], offset: usize, project: &str) -> Result<ImportSummary> {
        let data_type = self.spec.data_type;
        let mut summary = ImportSummary::default();

        for (position, item) in batch.iter().enumerate() {
            let index = offset + position;
            if let Some(field) = self.spec.missing_required(item) {
                summary.fail(format!("item {index}: missing required field '{field}'"));
                continue;
            }

            let hash = DuplicateTracker::hash(item, self.spec.dedup_fields);
            if self.tracker.is_duplicate(&hash) {
                debug!(index, "skipping duplicate record");
                summary.skipped_count += 1;
                continue;
            }

            let imported = retry_operation_if(&self.retry, "arize.import_item", is_retryable, || {
                self.target.import_item(project, data_type, item)
            })
            .await;

            match imported {
                Ok(()) => {
                    self.tracker.mark_imported(hash);
                    summary.success_count += 1;
                }
                Err(err) if err.is_auth() => return Err(err),
                Err(err) => summary.fail(format!("item {index}: {err}")),
            }
        }

        Ok(summary)
    }
}

fn is_retryable(err: &ArizeError) -> bool {
    !err.is_validation() && !err.is_auth()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use arize_core::{AsyncGraphQlTransport, GraphQlRequest};
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::time::Instant;

    use super::*;
    use crate::migration::target::GraphQlMigrationTarget;

    /// Records imported items; fails items whose `name` is listed.
    #[derive(Default)]
    struct RecordingTarget {
        failing: Vec<&'static str>,
        auth_failure: bool,
        imported: Mutex<Vec<Value>>,
        attempts: Mutex<usize>,
    }

    #[async_trait]
    impl MigrationTarget for RecordingTarget {
        async fn import_item(&self, _project: &str, _data_type: DataType, item: &Value) -> Result<()> {
            *self.attempts.lock().unwrap() += 1;
            if self.auth_failure {
                return Err(ArizeError::Auth("HTTP 401 Unauthorized".into()));
            }
            let name = item["name"].as_str().unwrap_or_default();
            if self.failing.contains(&name) {
                return Err(ArizeError::query("Error importing dataset", "rejected"));
            }
            self.imported.lock().unwrap().push(item.clone());
            Ok(())
        }
    }

    fn importer(target: Arc<RecordingTarget>, batch_size: usize) -> Importer {
        let config = MigrationConfig { batch_size, batch_delay_ms: 0, ..Default::default() };
        Importer::new(target, DataType::Datasets, config)
            .with_retry(RetryConfig::builder().max_retries(3).fixed_backoff(Duration::ZERO).build())
    }

    fn datasets(names: &[&str]) -> Vec<Value> {
        names.iter().enumerate().map(|(i, name)| json!({"id": format!("d{i}"), "name": name})).collect()
    }

    #[tokio::test]
    async fn failing_item_does_not_abort_siblings() {
        let target = Arc::new(RecordingTarget { failing: vec!["c"], ..Default::default() });
        let mut importer = importer(target.clone(), 2);

        let summary = importer.import_items(&datasets(&["a", "b", "c", "d", "e"]), "demo").await;

        assert_eq!(summary.success_count, 4);
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.skipped_count, 0);
        assert!(summary.errors[0].starts_with("item 2:"));
        assert_eq!(target.imported.lock().unwrap().len(), 4);
        // the failing item was retried up to the budget
        assert_eq!(*target.attempts.lock().unwrap(), 4 + 3);
    }

    #[tokio::test]
    async fn second_import_skips_duplicates() {
        let target = Arc::new(RecordingTarget::default());
        let mut importer = importer(target.clone(), 1000);
        let items = datasets(&["a", "b"]);

        let first = importer.import_items(&items, "demo").await;
        let second = importer.import_items(&items, "demo").await;

        assert_eq!(first.success_count, 2);
        assert_eq!(second.success_count, 0);
        assert_eq!(second.skipped_count, 2);
        assert_eq!(target.imported.lock().unwrap().len(), 2);

        importer.reset();
        assert_eq!(importer.import_items(&items, "demo").await.success_count, 2);
    }

    #[tokio::test]
    async fn missing_required_field_is_an_error_before_dedup() {
        let target = Arc::new(RecordingTarget::default());
        let mut importer = importer(target.clone(), 10);

        let summary = importer.import_items(&[json!({"id": "d0"}), json!({"id": "d0"})], "demo").await;

        assert_eq!(summary.error_count, 2);
        assert_eq!(summary.skipped_count, 0);
        assert_eq!(summary.errors[0], "item 0: missing required field 'name'");
        assert_eq!(*target.attempts.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn auth_failure_fails_whole_batch() {
        let target = Arc::new(RecordingTarget { auth_failure: true, ..Default::default() });
        let mut importer = importer(target, 2);

        let summary = importer.import_items(&datasets(&["a", "b", "c"]), "demo").await;

        assert_eq!(summary.success_count, 0);
        assert_eq!(summary.error_count, 3);
        assert_eq!(summary.errors.len(), 2);
        assert!(summary.errors[0].starts_with("batch 1 of 2 failed"));
    }

    /// Transport that answers every request with the same error.
    struct FailingTransport {
        error: ArizeError,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl AsyncGraphQlTransport for FailingTransport {
        async fn execute(&self, _request: &GraphQlRequest) -> Result<Value> {
            *self.calls.lock().unwrap() += 1;
            Err(self.error.clone())
        }
    }

    fn graphql_importer(transport: Arc<FailingTransport>, batch_size: usize) -> Importer {
        let config = MigrationConfig { batch_size, batch_delay_ms: 0, ..Default::default() };
        let target = Arc::new(GraphQlMigrationTarget::new(transport, "space-1"));
        Importer::new(target, DataType::Datasets, config)
            .with_retry(RetryConfig::exponential(3, Duration::from_secs(1)))
    }

    #[tokio::test(start_paused = true)]
    async fn unauthorized_mutation_abandons_batch_without_retry() {
        let transport = Arc::new(FailingTransport {
            error: ArizeError::Auth("HTTP 401 Unauthorized: invalid key".into()),
            calls: Mutex::new(0),
        });
        let mut importer = graphql_importer(transport.clone(), 3);
        let started = Instant::now();

        let summary = importer.import_items(&datasets(&["a", "b", "c"]), "demo").await;

        assert_eq!(*transport.calls.lock().unwrap(), 1);
        assert_eq!(summary.success_count, 0);
        assert_eq!(summary.error_count, 3);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].starts_with("batch 1 of 1 failed"), "{:?}", summary.errors);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_variables_fail_each_item_once() {
        let transport = Arc::new(FailingTransport {
            error: ArizeError::Network("unreachable".into()),
            calls: Mutex::new(0),
        });
        let mut importer = graphql_importer(transport.clone(), 10);
        let started = Instant::now();

        let summary = importer.import_items(&datasets(&["a", "b"]), " ").await;

        assert_eq!(*transport.calls.lock().unwrap(), 0);
        assert_eq!(summary.error_count, 2);
        assert!(summary.errors.iter().all(|e| e.contains("Validation error")), "{:?}", summary.errors);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn transport_failures_are_still_retried() {
        let transport = Arc::new(FailingTransport {
            error: ArizeError::Network("HTTP 503".into()),
            calls: Mutex::new(0),
        });
        let mut importer = graphql_importer(transport.clone(), 10);

        let summary = importer.import_items(&datasets(&["a"]), "demo").await;

        assert_eq!(*transport.calls.lock().unwrap(), 3);
        assert_eq!(summary.error_count, 1);
        assert!(summary.errors[0].starts_with("item 0: Error importing dataset: Network error"));
    }

    #[tokio::test]
    async fn export_file_round_trips_through_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datasets.json");
        let items = datasets(&["a", "b", "c"]);
        std::fs::write(&path, formats::encode(arize_domain::ExportFormat::Json, &items).unwrap()).unwrap();

        let loaded = Importer::load_export_data(&path).await.unwrap();
        assert_eq!(loaded, items);

        let target = Arc::new(RecordingTarget::default());
        let summary = importer(target, 10).import_data(&path, "demo").await.unwrap();
        assert_eq!(summary.success_count, 3);
    }
}
