//! Prompt hub queries.

use arize_domain::{NewPrompt, Prompt, PromptVersion, Result};
use serde::{Deserialize, Serialize};

use super::{CreatedNode, SpaceVariables};
use crate::graphql::descriptor::{require_non_empty, Variables};

connection_descriptor! {
    GetAllPromptsQuery {
        variables: SpaceVariables,
        item: Prompt,
        path: ["node", "prompts"],
        description: "Error getting prompts",
        query: r#"
            query getAllPrompts($spaceId: ID!, $endCursor: String) {
              node(id: $spaceId) {
                ... on Space {
                  prompts(first: 100, after: $endCursor) {
                    pageInfo { hasNextPage endCursor }
                    edges { node { id name description tags createdAt updatedAt } }
                  }
                }
              }
            }
        "#,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PromptByNameVariables {
    pub space_id: String,
    pub prompt_name: String,
}

impl Variables for PromptByNameVariables {
    fn validate(&self) -> Result<()> {
        require_non_empty("spaceId", &self.space_id)?;
        require_non_empty("promptName", &self.prompt_name)
    }
}

named_descriptor! {
    GetPromptByNameQuery {
        variables: PromptByNameVariables,
        item: Prompt,
        path: ["node", "prompts"],
        kind: "prompt",
        name_field: prompt_name,
        description: "Error getting prompt by name",
        query: r#"
            query getPromptByName($spaceId: ID!, $promptName: String!) {
              node(id: $spaceId) {
                ... on Space {
                  prompts(search: $promptName, first: 10) {
                    edges { node { id name description tags createdAt updatedAt } }
                  }
                }
              }
            }
        "#,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PromptVariables {
    pub prompt_id: String,
}

impl Variables for PromptVariables {
    fn validate(&self) -> Result<()> {
        require_non_empty("promptId", &self.prompt_id)
    }
}

connection_descriptor! {
    /// Version history of one prompt, newest first.
    GetPromptVersionsQuery {
        variables: PromptVariables,
        item: PromptVersion,
        path: ["node", "versionHistory"],
        description: "Error getting prompt versions",
        query: r#"
            query getPromptVersions($promptId: ID!, $endCursor: String) {
              node(id: $promptId) {
                ... on Prompt {
                  versionHistory(first: 100, after: $endCursor) {
                    pageInfo { hasNextPage endCursor }
                    edges {
                      node { id commitMessage provider modelName messages invocationParams createdAt }
                    }
                  }
                }
              }
            }
        "#,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromptVariables {
    pub space_id: String,
    #[serde(flatten)]
    pub prompt: NewPrompt,
}

impl Variables for CreatePromptVariables {
    fn validate(&self) -> Result<()> {
        require_non_empty("spaceId", &self.space_id)?;
        require_non_empty("name", &self.prompt.name)?;
        require_non_empty("commitMessage", &self.prompt.commit_message)?;
        require_non_empty("provider", &self.prompt.provider)?;
        if !self.prompt.messages.is_array() {
            return Err(arize_domain::ArizeError::Validation(
                "messages must be a list".to_string(),
            ));
        }
        Ok(())
    }
}

/// Creates a prompt together with its first version.
pub struct CreatePromptMutation;

impl crate::graphql::QueryDescriptor for CreatePromptMutation {
    type Variables = CreatePromptVariables;
    type Item = CreatedNode;

    const NAME: &'static str = "CreatePromptMutation";
    const DESCRIPTION: &'static str = "Error creating prompt";
    const KIND: crate::graphql::OperationKind = crate::graphql::OperationKind::Mutation;
    const QUERY: &'static str = r#"
        mutation createPrompt($input: CreatePromptMutationInput!) {
          createPrompt(input: $input) { prompt { id } }
        }
    "#;

    fn parse_page(
        data: &serde_json::Value,
        _variables: &CreatePromptVariables,
    ) -> std::result::Result<crate::graphql::Page<CreatedNode>, crate::graphql::ParseFailure> {
        crate::graphql::parse::mutation_payload(data, &["createPrompt", "prompt"])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeletePromptVariables {
    pub space_id: String,
    pub prompt_id: String,
}

impl Variables for DeletePromptVariables {
    fn validate(&self) -> Result<()> {
        require_non_empty("spaceId", &self.space_id)?;
        require_non_empty("promptId", &self.prompt_id)
    }
}

ack_mutation! {
    DeletePromptMutation {
        variables: DeletePromptVariables,
        field: "deletePrompt",
        description: "Error deleting prompt",
        query: r#"
            mutation deletePrompt($input: DeletePromptMutationInput!) {
              deletePrompt(input: $input) { clientMutationId }
            }
        "#,
    }
}
