//! File and table import job queries.

use arize_domain::{FileImportJob, NewFileImportJob, Result, TableImportJob};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::SpaceVariables;
use crate::graphql::descriptor::{require_non_empty, QueryDescriptor, Variables};
use crate::graphql::parse::{mutation_payload, Page, ParseFailure};
use crate::graphql::request::OperationKind;

connection_descriptor! {
    GetAllFileImportJobsQuery {
        variables: SpaceVariables,
        item: FileImportJob,
        path: ["node", "importJobs"],
        description: "Error getting file import jobs",
        query: r#"
            query getAllFileImportJobs($spaceId: ID!, $endCursor: String) {
              node(id: $spaceId) {
                ... on Space {
                  importJobs(first: 100, after: $endCursor) {
                    pageInfo { hasNextPage endCursor }
                    edges {
                      node {
                        id jobId jobStatus modelName createdAt
                        totalFilesPendingCount totalFilesSuccessCount totalFilesFailedCount
                      }
                    }
                  }
                }
              }
            }
        "#,
    }
}

connection_descriptor! {
    GetAllTableImportJobsQuery {
        variables: SpaceVariables,
        item: TableImportJob,
        path: ["node", "tableJobs"],
        description: "Error getting table import jobs",
        query: r#"
            query getAllTableImportJobs($spaceId: ID!, $endCursor: String) {
              node(id: $spaceId) {
                ... on Space {
                  tableJobs(first: 100, after: $endCursor) {
                    pageInfo { hasNextPage endCursor }
                    edges {
                      node {
                        id jobId jobStatus modelName tableStore createdAt
                        totalQueriesPendingCount totalQueriesSuccessCount totalQueriesFailedCount
                      }
                    }
                  }
                }
              }
            }
        "#,
    }
}

const BLOB_STORES: [&str; 3] = ["S3", "GCS", "Azure"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileImportJobVariables {
    pub space_id: String,
    #[serde(flatten)]
    pub job: NewFileImportJob,
}

impl Variables for CreateFileImportJobVariables {
    fn validate(&self) -> Result<()> {
        require_non_empty("spaceId", &self.space_id)?;
        require_non_empty("bucketName", &self.job.bucket_name)?;
        require_non_empty("modelName", &self.job.model_name)?;
        require_non_empty("modelType", &self.job.model_type)?;
        if !BLOB_STORES.contains(&self.job.blob_store.as_str()) {
            return Err(arize_domain::ArizeError::Validation(format!(
                "blobStore must be one of {}, got '{}'",
                BLOB_STORES.join(", "),
                self.job.blob_store
            )));
        }
        if !self.job.model_schema.is_object() {
            return Err(arize_domain::ArizeError::Validation(
                "modelSchema must be an object".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct CreateFileImportJobMutation;

impl QueryDescriptor for CreateFileImportJobMutation {
    type Variables = CreateFileImportJobVariables;
    type Item = FileImportJob;

    const NAME: &'static str = "CreateFileImportJobMutation";
    const DESCRIPTION: &'static str = "Error creating file import job";
    const KIND: OperationKind = OperationKind::Mutation;
    const QUERY: &'static str = r#"
        mutation createFileImportJob($input: CreateFileImportJobInput!) {
          createFileImportJob(input: $input) {
            fileImportJob {
              id jobId jobStatus modelName createdAt
              totalFilesPendingCount totalFilesSuccessCount totalFilesFailedCount
            }
          }
        }
    "#;

    fn parse_page(data: &Value, _variables: &CreateFileImportJobVariables) -> std::result::Result<Page<FileImportJob>, ParseFailure> {
        mutation_payload(data, &["createFileImportJob", "fileImportJob"])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeleteFileImportJobVariables {
    pub job_id: String,
}

impl Variables for DeleteFileImportJobVariables {
    fn validate(&self) -> Result<()> {
        require_non_empty("jobId", &self.job_id)
    }
}

ack_mutation! {
    DeleteFileImportJobMutation {
        variables: DeleteFileImportJobVariables,
        field: "deleteFileImportJob",
        description: "Error deleting file import job",
        query: r#"
            mutation deleteFileImportJob($input: DeleteFileImportJobInput!) {
              deleteFileImportJob(input: $input) { fileImportJob { jobStatus } }
            }
        "#,
    }
}
