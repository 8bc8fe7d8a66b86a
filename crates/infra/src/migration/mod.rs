//! Phoenix → Arize migration engine
//!
//! - [`phoenix_client`]: REST source
//! - [`exporter`] / [`formats`]: paged export into one file per data type
//! - [`importer`] / [`target`]: batched, deduplicated replay into Arize
//! - [`service`]: per-job orchestration and result bookkeeping

pub mod exporter;
pub mod formats;
pub mod importer;
pub mod phoenix_client;
pub mod service;
pub mod target;

pub use exporter::Exporter;
pub use importer::{ImportSummary, Importer};
pub use phoenix_client::PhoenixClient;
pub use service::MigrationService;
pub use target::GraphQlMigrationTarget;
