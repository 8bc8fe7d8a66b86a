//! Mutations used to write migrated Phoenix records into a space.
//!
//! One mutation per data type; all take the same input shape.

use arize_domain::{ArizeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::graphql::descriptor::{require_non_empty, Variables};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImportRecordVariables {
    pub space_id: String,
    pub project_name: String,
    pub record: Value,
}

impl Variables for ImportRecordVariables {
    fn validate(&self) -> Result<()> {
        require_non_empty("spaceId", &self.space_id)?;
        require_non_empty("projectName", &self.project_name)?;
        if !self.record.is_object() {
            return Err(ArizeError::Validation("record must be an object".to_string()));
        }
        Ok(())
    }
}

ack_mutation! {
    ImportDatasetMutation {
        variables: ImportRecordVariables,
        field: "importPhoenixDataset",
        description: "Error importing dataset",
        query: r#"
            mutation importPhoenixDataset($input: ImportPhoenixRecordInput!) {
              importPhoenixDataset(input: $input) { clientMutationId }
            }
        "#,
    }
}

ack_mutation! {
    ImportPromptMutation {
        variables: ImportRecordVariables,
        field: "importPhoenixPrompt",
        description: "Error importing prompt",
        query: r#"
            mutation importPhoenixPrompt($input: ImportPhoenixRecordInput!) {
              importPhoenixPrompt(input: $input) { clientMutationId }
            }
        "#,
    }
}

ack_mutation! {
    ImportTraceMutation {
        variables: ImportRecordVariables,
        field: "importPhoenixTrace",
        description: "Error importing trace",
        query: r#"
            mutation importPhoenixTrace($input: ImportPhoenixRecordInput!) {
              importPhoenixTrace(input: $input) { clientMutationId }
            }
        "#,
    }
}

ack_mutation! {
    ImportAnnotationMutation {
        variables: ImportRecordVariables,
        field: "importPhoenixAnnotation",
        description: "Error importing annotation",
        query: r#"
            mutation importPhoenixAnnotation($input: ImportPhoenixRecordInput!) {
              importPhoenixAnnotation(input: $input) { clientMutationId }
            }
        "#,
    }
}

ack_mutation! {
    ImportEvaluationMutation {
        variables: ImportRecordVariables,
        field: "importPhoenixEvaluation",
        description: "Error importing evaluation",
        query: r#"
            mutation importPhoenixEvaluation($input: ImportPhoenixRecordInput!) {
              importPhoenixEvaluation(input: $input) { clientMutationId }
            }
        "#,
    }
}
