//! Monitor records and creation specs.
//!
//! The three monitor categories share a create flow but use different
//! mutations, so creation input is modelled as the tagged union
//! [`MonitorSpec`] rather than one struct with category-dependent fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonitorCategory {
    #[serde(rename = "performance")]
    Performance,
    #[serde(rename = "drift")]
    Drift,
    #[serde(rename = "dataQuality")]
    DataQuality,
}

impl_domain_status_conversions!(MonitorCategory {
    Performance => "performance",
    Drift => "drift",
    DataQuality => "data_quality",
});

/// A monitor as returned by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    pub id: String,
    pub name: String,
    pub monitor_category: MonitorCategory,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_triggered: Option<bool>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub evaluation_interval_seconds: Option<i64>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
}

/// Threshold settings shared by every monitor category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorThreshold {
    /// Static threshold; `None` together with `dynamic_auto_threshold`
    /// lets the platform derive one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// Comparison operator: `greaterThan`, `lessThan`, ...
    pub operator: String,
    #[serde(default)]
    pub dynamic_auto_threshold: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMonitorSpec {
    pub name: String,
    /// e.g. `accuracy`, `f_1`, `mae`
    pub performance_metric: String,
    #[serde(flatten)]
    pub threshold: MonitorThreshold,
    #[serde(default = "default_environment")]
    pub model_environment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_metric_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_window_length_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftMonitorSpec {
    pub name: String,
    /// e.g. `psi`, `kl`, `js`
    pub drift_metric: String,
    /// `prediction`, `featureLabel`, `tagLabel`, ...
    pub dimension_category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension_name: Option<String>,
    #[serde(flatten)]
    pub threshold: MonitorThreshold,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityMonitorSpec {
    pub name: String,
    /// e.g. `percentEmpty`, `cardinality`, `avg`
    pub data_quality_metric: String,
    pub dimension_category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension_name: Option<String>,
    #[serde(flatten)]
    pub threshold: MonitorThreshold,
    #[serde(default = "default_environment")]
    pub model_environment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_environment() -> String {
    "production".to_string()
}

/// Creation input for any monitor category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "monitorCategory", rename_all = "camelCase")]
pub enum MonitorSpec {
    Performance(PerformanceMonitorSpec),
    Drift(DriftMonitorSpec),
    DataQuality(DataQualityMonitorSpec),
}

impl MonitorSpec {
    pub fn category(&self) -> MonitorCategory {
        match self {
            Self::Performance(_) => MonitorCategory::Performance,
            Self::Drift(_) => MonitorCategory::Drift,
            Self::DataQuality(_) => MonitorCategory::DataQuality,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Performance(spec) => &spec.name,
            Self::Drift(spec) => &spec.name,
            Self::DataQuality(spec) => &spec.name,
        }
    }

    pub fn threshold(&self) -> &MonitorThreshold {
        match self {
            Self::Performance(spec) => &spec.threshold,
            Self::Drift(spec) => &spec.threshold,
            Self::DataQuality(spec) => &spec.threshold,
        }
    }
}
