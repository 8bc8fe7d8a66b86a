//! Model records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A model registered in a space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_demo_model: bool,
}

/// Prediction volume of one model over a time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelVolume {
    pub name: String,
    pub total_volume: u64,
}
