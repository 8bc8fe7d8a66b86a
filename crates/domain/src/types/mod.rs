//! Domain types and models
//!
//! Wire records use `camelCase` field names to match the platform's GraphQL
//! schema; migration records use `snake_case` because they are written to
//! local files.

pub mod custom_metric;
pub mod dashboard;
pub mod evaluator;
pub mod import_job;
pub mod migration;
pub mod model;
pub mod monitor;
pub mod prompt;
pub mod space;

pub use custom_metric::{CustomMetric, NewCustomMetric};
pub use dashboard::Dashboard;
pub use evaluator::Evaluator;
pub use import_job::{FileImportJob, ImportJobStatus, NewFileImportJob, TableImportJob};
pub use migration::{
    DataType, ExportFilters, ExportFormat, FeasibilityReport, MigrationJob, MigrationResult,
    MigrationStatus,
};
pub use model::{Model, ModelVolume};
pub use monitor::{
    DataQualityMonitorSpec, DriftMonitorSpec, Monitor, MonitorCategory, MonitorSpec,
    PerformanceMonitorSpec,
};
pub use prompt::{NewPrompt, Prompt, PromptVersion};
pub use space::{Organization, Space, User};
