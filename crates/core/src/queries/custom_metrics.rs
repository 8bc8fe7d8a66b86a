//! Custom metric queries.

use arize_domain::{CustomMetric, NewCustomMetric, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CreatedNode, ModelVariables};
use crate::graphql::descriptor::{require_non_empty, QueryDescriptor, Variables};
use crate::graphql::parse::{mutation_payload, Page, ParseFailure};
use crate::graphql::request::OperationKind;

connection_descriptor! {
    GetAllCustomMetricsQuery {
        variables: ModelVariables,
        item: CustomMetric,
        path: ["node", "customMetrics"],
        description: "Error getting custom metrics",
        query: r#"
            query getAllCustomMetrics($modelId: ID!, $endCursor: String) {
              node(id: $modelId) {
                ... on Model {
                  customMetrics(first: 100, after: $endCursor) {
                    pageInfo { hasNextPage endCursor }
                    edges { node { id name description metric requiresPositiveClass createdAt } }
                  }
                }
              }
            }
        "#,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomMetricVariables {
    pub model_id: String,
    #[serde(flatten)]
    pub metric: NewCustomMetric,
}

impl Variables for CreateCustomMetricVariables {
    fn validate(&self) -> Result<()> {
        require_non_empty("modelId", &self.model_id)?;
        require_non_empty("name", &self.metric.name)?;
        require_non_empty("metric", &self.metric.metric)
    }
}

pub struct CreateCustomMetricMutation;

impl QueryDescriptor for CreateCustomMetricMutation {
    type Variables = CreateCustomMetricVariables;
    type Item = CreatedNode;

    const NAME: &'static str = "CreateCustomMetricMutation";
    const DESCRIPTION: &'static str = "Error creating custom metric";
    const KIND: OperationKind = OperationKind::Mutation;
    const QUERY: &'static str = r#"
        mutation createCustomMetric($input: CreateCustomMetricMutationInput!) {
          createCustomMetric(input: $input) { customMetric { id } }
        }
    "#;

    fn parse_page(data: &Value, _variables: &CreateCustomMetricVariables) -> std::result::Result<Page<CreatedNode>, ParseFailure> {
        mutation_payload(data, &["createCustomMetric", "customMetric"])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeleteCustomMetricVariables {
    pub custom_metric_id: String,
    pub model_id: String,
}

impl Variables for DeleteCustomMetricVariables {
    fn validate(&self) -> Result<()> {
        require_non_empty("customMetricId", &self.custom_metric_id)?;
        require_non_empty("modelId", &self.model_id)
    }
}

ack_mutation! {
    DeleteCustomMetricMutation {
        variables: DeleteCustomMetricVariables,
        field: "deleteCustomMetric",
        description: "Error deleting custom metric",
        query: r#"
            mutation deleteCustomMetric($input: DeleteCustomMetricMutationInput!) {
              deleteCustomMetric(input: $input) { model { id } }
            }
        "#,
    }
}
