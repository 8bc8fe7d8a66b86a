//! Model queries.

use arize_domain::{Model, ModelVolume, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ModelVariables, SpaceVariables};
use crate::graphql::descriptor::{require_non_empty, QueryDescriptor, Variables};
use crate::graphql::parse::{decode, value_at, Page, ParseFailure};

connection_descriptor! {
    /// Every model in a space.
    GetAllModelsQuery {
        variables: SpaceVariables,
        item: Model,
        path: ["node", "models"],
        description: "Error getting models",
        query: r#"
            query getAllModels($spaceId: ID!, $endCursor: String) {
              node(id: $spaceId) {
                ... on Space {
                  models(first: 100, after: $endCursor) {
                    pageInfo { hasNextPage endCursor }
                    edges { node { id name modelType createdAt isDemoModel } }
                  }
                }
              }
            }
        "#,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModelByNameVariables {
    pub space_id: String,
    pub model_name: String,
}

impl Variables for ModelByNameVariables {
    fn validate(&self) -> Result<()> {
        require_non_empty("spaceId", &self.space_id)?;
        require_non_empty("modelName", &self.model_name)
    }
}

named_descriptor! {
    GetModelByNameQuery {
        variables: ModelByNameVariables,
        item: Model,
        path: ["node", "models"],
        kind: "model",
        name_field: model_name,
        description: "Error getting model by name",
        query: r#"
            query getModelByName($spaceId: ID!, $modelName: String!) {
              node(id: $spaceId) {
                ... on Space {
                  models(search: $modelName, first: 10) {
                    edges { node { id name modelType createdAt isDemoModel } }
                  }
                }
              }
            }
        "#,
    }
}

/// `{ modelId, startTime?, endTime? }`; the platform defaults the window to
/// the last 30 days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModelVolumeVariables {
    pub model_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl Variables for ModelVolumeVariables {
    fn validate(&self) -> Result<()> {
        require_non_empty("modelId", &self.model_id)?;
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if start >= end {
                return Err(arize_domain::ArizeError::Validation(
                    "startTime must be before endTime".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeNode {
    name: String,
    #[serde(default)]
    model_prediction_volume: Option<VolumeTotals>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeTotals {
    #[serde(default)]
    total_volume: u64,
}

/// Prediction volume of one model.
pub struct GetModelVolumeQuery;

impl QueryDescriptor for GetModelVolumeQuery {
    type Variables = ModelVolumeVariables;
    type Item = ModelVolume;

    const NAME: &'static str = "GetModelVolumeQuery";
    const DESCRIPTION: &'static str = "Error getting model volume";
    const QUERY: &'static str = r#"
        query getModelVolume($modelId: ID!, $startTime: DateTime, $endTime: DateTime) {
          node(id: $modelId) {
            ... on Model {
              name
              modelPredictionVolume(startTime: $startTime, endTime: $endTime) {
                totalVolume
              }
            }
          }
        }
    "#;

    fn parse_page(data: &Value, variables: &ModelVolumeVariables) -> std::result::Result<Page<ModelVolume>, ParseFailure> {
        let node = value_at(data, &["node"])
            .map_err(|_| ParseFailure::NotFound(format!("model '{}' not found", variables.model_id)))?;
        let node: VolumeNode = decode(node, "model volume")?;
        Ok(Page::single(ModelVolume {
            name: node.name,
            total_volume: node.model_prediction_volume.map(|v| v.total_volume).unwrap_or(0),
        }))
    }
}

ack_mutation! {
    DeleteModelQuery {
        variables: ModelVariables,
        field: "deleteModel",
        description: "Error deleting model",
        query: r#"
            mutation deleteModel($input: DeleteModelMutationInput!) {
              deleteModel(input: $input) { clientMutationId }
            }
        "#,
    }
}
