//! Configuration structures
//!
//! Credentials are resolved by layering [`ProfileConfig`] values (explicit
//! override, environment, profile file) and collapsing them into an
//! [`ArizeConfig`]. Loading the layers is the infrastructure crate's job; the
//! resolved structs are passed explicitly into client constructors.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_APP_URL, DEFAULT_BATCH_DELAY_MS, DEFAULT_EXPORT_PAGE_SIZE, DEFAULT_IMPORT_BATCH_SIZE,
    DEFAULT_MAX_PAGES, DEFAULT_MAX_RETRIES, DEFAULT_PHOENIX_URL, DEFAULT_RETRY_DELAY_MS,
    GRAPHQL_PATH,
};
use crate::errors::{ArizeError, Result};
use crate::types::ExportFormat;

/// One layer of optional credential values.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_url: Option<String>,
}

impl fmt::Debug for ProfileConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("organization", &self.organization)
            .field("space", &self.space)
            .field("app_url", &self.app_url)
            .finish()
    }
}

/// On-disk config file: named profiles under `[profiles.<name>]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileConfig>,
}

/// Fully resolved connection settings for the Arize platform.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArizeConfig {
    pub api_key: String,
    pub organization: String,
    pub space: String,
    pub app_url: String,
}

impl fmt::Debug for ArizeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArizeConfig")
            .field("api_key", &"<redacted>")
            .field("organization", &self.organization)
            .field("space", &self.space)
            .field("app_url", &self.app_url)
            .finish()
    }
}

impl ArizeConfig {
    /// Collapse layers in precedence order (first `Some` wins per field).
    ///
    /// `app_url` falls back to the public platform URL; every other field is
    /// required.
    pub fn resolve(layers: &[&ProfileConfig]) -> Result<Self> {
        fn first_set<'a>(values: impl IntoIterator<Item = Option<&'a String>>) -> Option<String> {
            values.into_iter().flatten().find(|v| !v.trim().is_empty()).cloned()
        }

        let api_key = first_set(layers.iter().map(|l| l.api_key.as_ref()))
            .ok_or_else(|| ArizeError::Config("api_key is not configured".into()))?;
        let organization = first_set(layers.iter().map(|l| l.organization.as_ref()))
            .ok_or_else(|| ArizeError::Config("organization is not configured".into()))?;
        let space = first_set(layers.iter().map(|l| l.space.as_ref()))
            .ok_or_else(|| ArizeError::Config("space is not configured".into()))?;
        let app_url = first_set(layers.iter().map(|l| l.app_url.as_ref()))
            .unwrap_or_else(|| DEFAULT_APP_URL.to_string());

        Ok(Self { api_key, organization, space, app_url: app_url.trim_end_matches('/').to_string() })
    }

    /// The single GraphQL endpoint every request is posted to.
    pub fn graphql_url(&self) -> String {
        format!("{}{}", self.app_url.trim_end_matches('/'), GRAPHQL_PATH)
    }
}

/// Knobs shared by the sync and async domain clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Per-request timeout enforced by the HTTP transport
    pub timeout: Duration,
    /// Safety bound on page fetches per paginated query
    pub max_pages: usize,
    /// Pause between successive page fetches
    pub page_delay: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_pages: DEFAULT_MAX_PAGES,
            page_delay: Duration::ZERO,
        }
    }
}

/// Phoenix → Arize migration engine settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    pub phoenix_url: String,
    pub phoenix_api_key: Option<String>,
    pub batch_size: usize,
    pub batch_delay_ms: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub export_page_size: u32,
    pub max_records_per_type: Option<usize>,
    pub export_format: ExportFormat,
    pub include_details: bool,
}

impl fmt::Debug for MigrationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationConfig")
            .field("phoenix_url", &self.phoenix_url)
            .field("phoenix_api_key", &self.phoenix_api_key.as_ref().map(|_| "<redacted>"))
            .field("batch_size", &self.batch_size)
            .field("batch_delay_ms", &self.batch_delay_ms)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("export_page_size", &self.export_page_size)
            .field("max_records_per_type", &self.max_records_per_type)
            .field("export_format", &self.export_format)
            .field("include_details", &self.include_details)
            .finish()
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            phoenix_url: DEFAULT_PHOENIX_URL.to_string(),
            phoenix_api_key: None,
            batch_size: DEFAULT_IMPORT_BATCH_SIZE,
            batch_delay_ms: DEFAULT_BATCH_DELAY_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            export_page_size: DEFAULT_EXPORT_PAGE_SIZE,
            max_records_per_type: None,
            export_format: ExportFormat::Json,
            include_details: true,
        }
    }
}

impl MigrationConfig {
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(ArizeError::Validation("batch_size must be greater than 0".into()));
        }
        if self.export_page_size == 0 {
            return Err(ArizeError::Validation("export_page_size must be greater than 0".into()));
        }
        Ok(())
    }
}
