//! Port interfaces for the migration engine

use arize_domain::{DataType, ExportFilters, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Read side: a Phoenix server (or anything shaped like one).
#[async_trait]
pub trait PhoenixSource: Send + Sync {
    /// Fetch the project record; `None` when the project does not exist
    async fn get_project(&self, project: &str) -> Result<Option<Value>>;

    /// Fetch one page of `data_type` records. Pages are 1-based; an empty
    /// vector marks the end of the collection.
    async fn fetch_page(
        &self,
        project: &str,
        data_type: DataType,
        page: u32,
        page_size: u32,
        filters: &ExportFilters,
    ) -> Result<Vec<Value>>;

    /// Fetch the nested sub-resources of one record (dataset examples,
    /// prompt versions, trace spans). `None` when the type has none.
    async fn fetch_details(&self, data_type: DataType, item: &Value) -> Result<Option<Value>>;
}

/// Write side: where exported records are replayed.
#[async_trait]
pub trait MigrationTarget: Send + Sync {
    /// Import one record
    async fn import_item(&self, project: &str, data_type: DataType, item: &Value) -> Result<()>;
}
