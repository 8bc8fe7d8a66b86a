//! Toolkit constants
//!
//! Centralized location for wire-level and engine defaults.

// Platform endpoints
pub const DEFAULT_APP_URL: &str = "https://app.arize.com";
pub const GRAPHQL_PATH: &str = "/graphql";
pub const API_KEY_HEADER: &str = "x-api-key";
pub const DEFAULT_PROFILE: &str = "default";

// Pagination
pub const DEFAULT_MAX_PAGES: usize = 100;
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const SMALL_PAGE_SIZE: u32 = 10;

// Phoenix migration
pub const DEFAULT_PHOENIX_URL: &str = "http://localhost:6006";
pub const DEFAULT_IMPORT_BATCH_SIZE: usize = 1000;
pub const DEFAULT_BATCH_DELAY_MS: u64 = 100;
pub const DEFAULT_EXPORT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
pub const EXPORT_ROOT_DIR: &str = "phoenix_export";
pub const MIGRATION_RESULTS_FILE: &str = "migration_results.json";
