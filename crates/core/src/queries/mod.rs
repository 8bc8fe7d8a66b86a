//! Catalogue of platform queries and mutations
//!
//! Each descriptor is a unit struct implementing [`QueryDescriptor`]; the
//! clients in `arize-infra` run them through the executors. Shared variable
//! shapes live here, operation-specific ones next to their descriptor.

use arize_domain::Result;
use serde::{Deserialize, Serialize};

use crate::graphql::descriptor::{require_non_empty, Variables};

/// Descriptor whose page is the relay connection at a fixed JSON path.
macro_rules! connection_descriptor {
    (
        $(#[$meta:meta])*
        $name:ident {
            variables: $vars:ty,
            item: $item:ty,
            path: [$($segment:literal),+ $(,)?],
            description: $description:literal,
            query: $query:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        pub struct $name;

        impl $crate::graphql::QueryDescriptor for $name {
            type Variables = $vars;
            type Item = $item;
            const NAME: &'static str = stringify!($name);
            const QUERY: &'static str = $query;
            const DESCRIPTION: &'static str = $description;

            fn parse_page(
                data: &serde_json::Value,
                _variables: &$vars,
            ) -> std::result::Result<$crate::graphql::Page<$item>, $crate::graphql::ParseFailure> {
                $crate::graphql::parse::connection_page(data, &[$($segment),+])
            }
        }
    };
}

/// Descriptor that searches a connection and keeps the exact name match.
macro_rules! named_descriptor {
    (
        $(#[$meta:meta])*
        $name:ident {
            variables: $vars:ty,
            item: $item:ty,
            path: [$($segment:literal),+ $(,)?],
            kind: $kind:literal,
            name_field: $field:ident,
            description: $description:literal,
            query: $query:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        pub struct $name;

        impl $crate::graphql::QueryDescriptor for $name {
            type Variables = $vars;
            type Item = $item;
            const NAME: &'static str = stringify!($name);
            const QUERY: &'static str = $query;
            const DESCRIPTION: &'static str = $description;

            fn parse_page(
                data: &serde_json::Value,
                variables: &$vars,
            ) -> std::result::Result<$crate::graphql::Page<$item>, $crate::graphql::ParseFailure> {
                $crate::graphql::parse::find_named(
                    data,
                    &[$($segment),+],
                    $kind,
                    &variables.$field,
                    |item: &$item| item.name.as_str(),
                )
            }
        }
    };
}

/// Mutation whose result is the presence of its payload field.
macro_rules! ack_mutation {
    (
        $(#[$meta:meta])*
        $name:ident {
            variables: $vars:ty,
            field: $field:literal,
            description: $description:literal,
            query: $query:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        pub struct $name;

        impl $crate::graphql::QueryDescriptor for $name {
            type Variables = $vars;
            type Item = bool;
            const NAME: &'static str = stringify!($name);
            const QUERY: &'static str = $query;
            const DESCRIPTION: &'static str = $description;
            const KIND: $crate::graphql::OperationKind = $crate::graphql::OperationKind::Mutation;

            fn parse_page(
                data: &serde_json::Value,
                _variables: &$vars,
            ) -> std::result::Result<$crate::graphql::Page<bool>, $crate::graphql::ParseFailure> {
                $crate::graphql::parse::mutation_ack(data, $field)
            }
        }
    };
}

pub mod account;
pub mod custom_metrics;
pub mod dashboards;
pub mod evaluators;
pub mod imports;
pub mod migration;
pub mod models;
pub mod monitors;
pub mod prompts;

pub use account::{GetAllSpacesQuery, GetAllUsersQuery, OrgAndSpaceIds, OrgIdAndSpaceIdQuery};
pub use custom_metrics::{
    CreateCustomMetricMutation, DeleteCustomMetricMutation, GetAllCustomMetricsQuery,
};
pub use dashboards::{GetAllDashboardsQuery, GetDashboardByNameQuery};
pub use evaluators::GetAllEvaluatorsQuery;
pub use imports::{
    CreateFileImportJobMutation, DeleteFileImportJobMutation, GetAllFileImportJobsQuery,
    GetAllTableImportJobsQuery,
};
pub use models::{DeleteModelQuery, GetAllModelsQuery, GetModelByNameQuery, GetModelVolumeQuery};
pub use monitors::{
    CreateDataQualityMonitorMutation, CreateDriftMonitorMutation,
    CreatePerformanceMonitorMutation, DeleteMonitorMutation, GetAllMonitorsQuery,
    GetMonitorByNameQuery,
};
pub use prompts::{
    CreatePromptMutation, DeletePromptMutation, GetAllPromptsQuery, GetPromptByNameQuery,
    GetPromptVersionsQuery,
};

/// `{ spaceId }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SpaceVariables {
    pub space_id: String,
}

impl SpaceVariables {
    pub fn new(space_id: impl Into<String>) -> Self {
        Self { space_id: space_id.into() }
    }
}

impl Variables for SpaceVariables {
    fn validate(&self) -> Result<()> {
        require_non_empty("spaceId", &self.space_id)
    }
}

/// `{ modelId }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModelVariables {
    pub model_id: String,
}

impl ModelVariables {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self { model_id: model_id.into() }
    }
}

impl Variables for ModelVariables {
    fn validate(&self) -> Result<()> {
        require_non_empty("modelId", &self.model_id)
    }
}

/// `{ organizationId }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrganizationVariables {
    pub organization_id: String,
}

impl OrganizationVariables {
    pub fn new(organization_id: impl Into<String>) -> Self {
        Self { organization_id: organization_id.into() }
    }
}

impl Variables for OrganizationVariables {
    fn validate(&self) -> Result<()> {
        require_non_empty("organizationId", &self.organization_id)
    }
}

/// Id of a node created by a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedNode {
    pub id: String,
}
