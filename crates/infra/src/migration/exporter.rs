//! Phoenix export
//!
//! Pages through one data type of a project until a page comes back empty,
//! optionally nesting each record's detail sub-resources, then writes the
//! accumulated list as a single file. Every page fetch is retried (3
//! attempts, 1s doubling); detail lookups are best-effort.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use arize_common::{retry_operation, RetryConfig};
use arize_core::PhoenixSource;
use arize_domain::{DataType, ExportFilters, MigrationConfig, Result};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::formats;
use crate::errors::conversions::to_domain;

/// Key under which a record's detail sub-resources are nested, which is also
/// the REST resource they are fetched from.
pub fn details_key(data_type: DataType) -> Option<&'static str> {
    match data_type {
        DataType::Datasets => Some("examples"),
        DataType::Prompts => Some("versions"),
        DataType::Traces => Some("spans"),
        DataType::Annotations | DataType::Evaluations => None,
    }
}

pub struct Exporter {
    source: Arc<dyn PhoenixSource>,
    config: MigrationConfig,
    retry: RetryConfig,
}

impl Exporter {
    pub fn new(source: Arc<dyn PhoenixSource>, config: MigrationConfig) -> Self {
        Self { source, config, retry: RetryConfig::exponential(3, Duration::from_secs(1)) }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn fetch_page(
        &self,
        project: &str,
        data_type: DataType,
        page: u32,
        filters: &ExportFilters,
    ) -> Result<Vec<Value>> {
        let page_size = self.config.export_page_size;
        retry_operation(&self.retry, "phoenix.fetch_page", || {
            self.source.fetch_page(project, data_type, page, page_size, filters)
        })
        .await
    }

    /// Number of records an export would produce. Never fails: any error
    /// is logged and reported as zero.
    #[instrument(skip(self))]
    pub async fn estimate_count(&self, project: &str, data_type: DataType) -> u64 {
        let cap = self.config.max_records_per_type;
        let filters = ExportFilters::default();
        let mut total = 0usize;
        let mut page = 1;

        loop {
            match self.fetch_page(project, data_type, page, &filters).await {
                Ok(items) if items.is_empty() => break,
                Ok(items) => total += items.len(),
                Err(err) => {
                    warn!(error = %err, "could not estimate record count");
                    return 0;
                }
            }
            if cap.is_some_and(|cap| total >= cap) {
                break;
            }
            page += 1;
        }

        cap.map_or(total, |cap| total.min(cap)) as u64
    }

    /// Every record of `data_type`, details nested, cap applied.
    pub async fn collect(
        &self,
        project: &str,
        data_type: DataType,
        filters: &ExportFilters,
    ) -> Result<Vec<Value>> {
        let cap = filters.limit.or(self.config.max_records_per_type);
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let items = self.fetch_page(project, data_type, page, filters).await?;
            if items.is_empty() {
                break;
            }
            for item in items {
                records.push(self.with_details(data_type, item).await);
            }
            if cap.is_some_and(|cap| records.len() >= cap) {
                break;
            }
            page += 1;
        }

        if let Some(cap) = cap {
            records.truncate(cap);
        }
        Ok(records)
    }

    async fn with_details(&self, data_type: DataType, mut item: Value) -> Value {
        let Some(key) = details_key(data_type).filter(|_| self.config.include_details) else {
            return item;
        };
        match self.source.fetch_details(data_type, &item).await {
            Ok(Some(details)) => {
                if let Value::Object(map) = &mut item {
                    map.insert(key.to_string(), details);
                }
            }
            Ok(None) => {}
            Err(err) => warn!(data_type = %data_type, error = %err, "skipping record details"),
        }
        item
    }

    /// Export one data type into `output_dir`. `None` when the project has
    /// no records of that type.
    #[instrument(skip(self, output_dir, filters))]
    pub async fn export(
        &self,
        project: &str,
        data_type: DataType,
        output_dir: &Path,
        filters: &ExportFilters,
    ) -> Result<Option<PathBuf>> {
        let records = self.collect(project, data_type, filters).await?;
        if records.is_empty() {
            info!("no records to export");
            return Ok(None);
        }

        let format = self.config.export_format;
        let bytes = formats::encode(format, &records)?;
        tokio::fs::create_dir_all(output_dir).await.map_err(to_domain)?;
        let path = output_dir.join(format!("{}.{}", data_type.collection_key(), format.extension()));
        tokio::fs::write(&path, bytes).await.map_err(to_domain)?;

        info!(records = records.len(), path = %path.display(), "exported records");
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use arize_domain::ArizeError;
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;

    /// Serves `pages` in order for every data type, failing the first
    /// `flaky` calls.
    struct PagedSource {
        pages: Vec<Vec<Value>>,
        flaky: u32,
        calls: AtomicU32,
    }

    impl PagedSource {
        fn new(pages: Vec<Vec<Value>>) -> Self {
            Self { pages, flaky: 0, calls: AtomicU32::new(0) }
        }
    }

    #[async_trait]
    impl PhoenixSource for PagedSource {
        async fn get_project(&self, _project: &str) -> Result<Option<Value>> {
            Ok(Some(json!({"name": "demo"})))
        }

        async fn fetch_page(
            &self,
            _project: &str,
            _data_type: DataType,
            page: u32,
            _page_size: u32,
            _filters: &ExportFilters,
        ) -> Result<Vec<Value>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.flaky {
                return Err(ArizeError::Network("connection reset".into()));
            }
            Ok(self.pages.get(page as usize - 1).cloned().unwrap_or_default())
        }

        async fn fetch_details(&self, _data_type: DataType, item: &Value) -> Result<Option<Value>> {
            Ok(Some(json!([{"of": item["id"]}])))
        }
    }

    fn pages() -> Vec<Vec<Value>> {
        vec![
            vec![json!({"id": "d1", "name": "a"}), json!({"id": "d2", "name": "b"})],
            vec![json!({"id": "d3", "name": "c"})],
        ]
    }

    fn exporter(source: PagedSource, config: MigrationConfig) -> Exporter {
        Exporter::new(Arc::new(source), config)
            .with_retry(RetryConfig::builder().max_retries(3).fixed_backoff(Duration::ZERO).build())
    }

    #[tokio::test]
    async fn export_writes_every_page_with_details() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter(PagedSource::new(pages()), MigrationConfig::default());

        let path = exporter
            .export("demo", DataType::Datasets, dir.path(), &ExportFilters::default())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(path, dir.path().join("datasets.json"));
        let written: Vec<Value> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written.len(), 3);
        assert_eq!(written[2]["examples"], json!([{"of": "d3"}]));
    }

    #[tokio::test]
    async fn empty_project_exports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter(PagedSource::new(Vec::new()), MigrationConfig::default());

        let exported =
            exporter.export("demo", DataType::Traces, dir.path(), &ExportFilters::default()).await.unwrap();

        assert_eq!(exported, None);
        assert!(!dir.path().join("traces.json").exists());
    }

    #[tokio::test]
    async fn limit_truncates_and_overrides_configured_cap() {
        let config = MigrationConfig { max_records_per_type: Some(1), include_details: false, ..Default::default() };
        let exporter = exporter(PagedSource::new(pages()), config);

        let capped = exporter.collect("demo", DataType::Datasets, &ExportFilters::default()).await.unwrap();
        assert_eq!(capped, vec![json!({"id": "d1", "name": "a"})]);

        let filters = ExportFilters { limit: Some(2), ..Default::default() };
        let limited = exporter.collect("demo", DataType::Datasets, &filters).await.unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn transient_page_failures_are_retried() {
        let source = PagedSource { flaky: 2, ..PagedSource::new(pages()) };
        let exporter = exporter(source, MigrationConfig::default());

        let records = exporter.collect("demo", DataType::Prompts, &ExportFilters::default()).await.unwrap();
        assert_eq!(records.len(), 3);
    }

    #[tokio::test]
    async fn estimate_is_zero_when_source_keeps_failing() {
        let source = PagedSource { flaky: u32::MAX, ..PagedSource::new(pages()) };
        let exporter = exporter(source, MigrationConfig::default());

        assert_eq!(exporter.estimate_count("demo", DataType::Traces).await, 0);
    }

    #[tokio::test]
    async fn estimate_counts_all_pages() {
        let exporter = exporter(PagedSource::new(pages()), MigrationConfig::default());
        assert_eq!(exporter.estimate_count("demo", DataType::Traces).await, 3);
    }
}
