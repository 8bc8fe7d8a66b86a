//! Monitor queries and the three per-category create mutations.

use arize_domain::{
    ArizeError, DataQualityMonitorSpec, DriftMonitorSpec, Monitor, MonitorCategory,
    PerformanceMonitorSpec, Result,
};
use arize_domain::types::monitor::MonitorThreshold;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::CreatedNode;
use crate::graphql::descriptor::{require_non_empty, QueryDescriptor, Variables};
use crate::graphql::parse::{mutation_payload, Page, ParseFailure};
use crate::graphql::request::OperationKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MonitorListVariables {
    pub model_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_category: Option<MonitorCategory>,
}

impl Variables for MonitorListVariables {
    fn validate(&self) -> Result<()> {
        require_non_empty("modelId", &self.model_id)
    }
}

connection_descriptor! {
    /// Monitors of one model, optionally narrowed to a category.
    GetAllMonitorsQuery {
        variables: MonitorListVariables,
        item: Monitor,
        path: ["node", "monitors"],
        description: "Error getting monitors",
        query: r#"
            query getAllMonitors($modelId: ID!, $monitorCategory: MonitorCategory, $endCursor: String) {
              node(id: $modelId) {
                ... on Model {
                  monitors(first: 100, after: $endCursor, monitorCategory: $monitorCategory) {
                    pageInfo { hasNextPage endCursor }
                    edges {
                      node {
                        id name monitorCategory status isTriggered threshold
                        operator notes evaluationIntervalSeconds createdDate
                      }
                    }
                  }
                }
              }
            }
        "#,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MonitorByNameVariables {
    pub model_id: String,
    pub monitor_name: String,
}

impl Variables for MonitorByNameVariables {
    fn validate(&self) -> Result<()> {
        require_non_empty("modelId", &self.model_id)?;
        require_non_empty("monitorName", &self.monitor_name)
    }
}

named_descriptor! {
    GetMonitorByNameQuery {
        variables: MonitorByNameVariables,
        item: Monitor,
        path: ["node", "monitors"],
        kind: "monitor",
        name_field: monitor_name,
        description: "Error getting monitor by name",
        query: r#"
            query getMonitorByName($modelId: ID!, $monitorName: String!) {
              node(id: $modelId) {
                ... on Model {
                  monitors(search: $monitorName, first: 10) {
                    edges {
                      node {
                        id name monitorCategory status isTriggered threshold
                        operator notes evaluationIntervalSeconds createdDate
                      }
                    }
                  }
                }
              }
            }
        "#,
    }
}

fn validate_threshold(threshold: &MonitorThreshold) -> Result<()> {
    require_non_empty("operator", &threshold.operator)?;
    if threshold.threshold.is_none() && !threshold.dynamic_auto_threshold {
        return Err(ArizeError::Validation(
            "threshold is required unless dynamicAutoThreshold is set".to_string(),
        ));
    }
    Ok(())
}

/// Creation input: the model id plus the category's spec fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMonitorVariables<S> {
    pub model_id: String,
    #[serde(flatten)]
    pub spec: S,
}

impl Variables for CreateMonitorVariables<PerformanceMonitorSpec> {
    fn validate(&self) -> Result<()> {
        require_non_empty("modelId", &self.model_id)?;
        require_non_empty("name", &self.spec.name)?;
        require_non_empty("performanceMetric", &self.spec.performance_metric)?;
        validate_threshold(&self.spec.threshold)
    }
}

impl Variables for CreateMonitorVariables<DriftMonitorSpec> {
    fn validate(&self) -> Result<()> {
        require_non_empty("modelId", &self.model_id)?;
        require_non_empty("name", &self.spec.name)?;
        require_non_empty("driftMetric", &self.spec.drift_metric)?;
        require_non_empty("dimensionCategory", &self.spec.dimension_category)?;
        validate_threshold(&self.spec.threshold)
    }
}

impl Variables for CreateMonitorVariables<DataQualityMonitorSpec> {
    fn validate(&self) -> Result<()> {
        require_non_empty("modelId", &self.model_id)?;
        require_non_empty("name", &self.spec.name)?;
        require_non_empty("dataQualityMetric", &self.spec.data_quality_metric)?;
        require_non_empty("dimensionCategory", &self.spec.dimension_category)?;
        validate_threshold(&self.spec.threshold)
    }
}

macro_rules! create_monitor_mutation {
    ($name:ident, $spec:ty, $field:literal, $description:literal, $query:expr) => {
        pub struct $name;

        impl QueryDescriptor for $name {
            type Variables = CreateMonitorVariables<$spec>;
            type Item = CreatedNode;

            const NAME: &'static str = stringify!($name);
            const QUERY: &'static str = $query;
            const DESCRIPTION: &'static str = $description;
            const KIND: OperationKind = OperationKind::Mutation;

            fn parse_page(
                data: &Value,
                _variables: &Self::Variables,
            ) -> std::result::Result<Page<CreatedNode>, ParseFailure> {
                mutation_payload(data, &[$field, "monitor"])
            }
        }
    };
}

create_monitor_mutation!(
    CreatePerformanceMonitorMutation,
    PerformanceMonitorSpec,
    "createPerformanceMonitor",
    "Error creating performance monitor",
    r#"
        mutation createPerformanceMonitor($input: CreatePerformanceMonitorMutationInput!) {
          createPerformanceMonitor(input: $input) { monitor { id } }
        }
    "#
);

create_monitor_mutation!(
    CreateDriftMonitorMutation,
    DriftMonitorSpec,
    "createDriftMonitor",
    "Error creating drift monitor",
    r#"
        mutation createDriftMonitor($input: CreateDriftMonitorMutationInput!) {
          createDriftMonitor(input: $input) { monitor { id } }
        }
    "#
);

create_monitor_mutation!(
    CreateDataQualityMonitorMutation,
    DataQualityMonitorSpec,
    "createDataQualityMonitor",
    "Error creating data quality monitor",
    r#"
        mutation createDataQualityMonitor($input: CreateDataQualityMonitorMutationInput!) {
          createDataQualityMonitor(input: $input) { monitor { id } }
        }
    "#
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeleteMonitorVariables {
    pub monitor_id: String,
}

impl Variables for DeleteMonitorVariables {
    fn validate(&self) -> Result<()> {
        require_non_empty("monitorId", &self.monitor_id)
    }
}

ack_mutation! {
    DeleteMonitorMutation {
        variables: DeleteMonitorVariables,
        field: "deleteMonitor",
        description: "Error deleting monitor",
        query: r#"
            mutation deleteMonitor($input: DeleteMonitorMutationInput!) {
              deleteMonitor(input: $input) { monitor { id } }
            }
        "#,
    }
}
