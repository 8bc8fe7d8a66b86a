//! Custom metric records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomMetric {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Metric expression, e.g. `SELECT avg(prediction) FROM model`
    pub metric: String,
    #[serde(default)]
    pub requires_positive_class: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields supplied when creating a custom metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomMetric {
    pub name: String,
    pub metric: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub requires_positive_class: bool,
}
