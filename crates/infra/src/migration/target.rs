//! Arize side of the migration: one GraphQL mutation per data type.

use std::sync::Arc;

use arize_core::graphql::async_executor::run_single;
use arize_core::queries::migration::{
    ImportAnnotationMutation, ImportDatasetMutation, ImportEvaluationMutation,
    ImportPromptMutation, ImportRecordVariables, ImportTraceMutation,
};
use arize_core::{AsyncGraphQlTransport, MigrationTarget};
use arize_domain::{DataType, Result};
use async_trait::async_trait;
use serde_json::Value;

pub struct GraphQlMigrationTarget {
    transport: Arc<dyn AsyncGraphQlTransport>,
    space_id: String,
}

impl GraphQlMigrationTarget {
    pub fn new(transport: Arc<dyn AsyncGraphQlTransport>, space_id: impl Into<String>) -> Self {
        Self { transport, space_id: space_id.into() }
    }
}

#[async_trait]
impl MigrationTarget for GraphQlMigrationTarget {
    async fn import_item(&self, project: &str, data_type: DataType, item: &Value) -> Result<()> {
        let variables = ImportRecordVariables {
            space_id: self.space_id.clone(),
            project_name: project.to_string(),
            record: item.clone(),
        };
        let transport = self.transport.as_ref();
        match data_type {
            DataType::Datasets => run_single::<ImportDatasetMutation, _>(transport, &variables).await,
            DataType::Prompts => run_single::<ImportPromptMutation, _>(transport, &variables).await,
            DataType::Traces => run_single::<ImportTraceMutation, _>(transport, &variables).await,
            DataType::Annotations => run_single::<ImportAnnotationMutation, _>(transport, &variables).await,
            DataType::Evaluations => run_single::<ImportEvaluationMutation, _>(transport, &variables).await,
        }?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::client::test_support::RoutedTransport;

    #[tokio::test]
    async fn each_data_type_posts_its_own_mutation() {
        let transport = Arc::new(RoutedTransport::new(|operation, _| {
            json!({ "data": { operation: { "clientMutationId": null } } })
        }));
        let log = transport.log();
        let target = GraphQlMigrationTarget::new(transport, "space-1");

        target.import_item("demo", DataType::Annotations, &json!({"span_id": "s1"})).await.unwrap();

        assert_eq!(log.operations(), vec!["importPhoenixAnnotation"]);
        assert_eq!(
            log.last_variables("importPhoenixAnnotation").unwrap(),
            json!({ "input": { "spaceId": "space-1", "projectName": "demo", "record": {"span_id": "s1"} } })
        );
    }

    #[tokio::test]
    async fn rejected_record_is_a_query_error() {
        let transport = Arc::new(RoutedTransport::new(|_, _| {
            json!({ "errors": [ { "message": "trace already exists" } ] })
        }));
        let target = GraphQlMigrationTarget::new(transport, "space-1");

        let err = target.import_item("demo", DataType::Traces, &json!({"trace_id": "t1"})).await.unwrap_err();
        assert_eq!(err.to_string(), "Error importing trace: GraphQL errors: trace already exists");
    }
}
