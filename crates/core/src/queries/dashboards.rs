use arize_domain::{Dashboard, Result};
use serde::{Deserialize, Serialize};

use super::SpaceVariables;
use crate::graphql::descriptor::{require_non_empty, Variables};

connection_descriptor! {
    GetAllDashboardsQuery {
        variables: SpaceVariables,
        item: Dashboard,
        path: ["node", "dashboards"],
        description: "Error getting dashboards",
        query: r#"
            query getAllDashboards($spaceId: ID!, $endCursor: String) {
              node(id: $spaceId) {
                ... on Space {
                  dashboards(first: 100, after: $endCursor) {
                    pageInfo { hasNextPage endCursor }
                    edges { node { id name status createdAt } }
                  }
                }
              }
            }
        "#,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DashboardByNameVariables {
    pub space_id: String,
    pub dashboard_name: String,
}

impl Variables for DashboardByNameVariables {
    fn validate(&self) -> Result<()> {
        require_non_empty("spaceId", &self.space_id)?;
        require_non_empty("dashboardName", &self.dashboard_name)
    }
}

named_descriptor! {
    GetDashboardByNameQuery {
        variables: DashboardByNameVariables,
        item: Dashboard,
        path: ["node", "dashboards"],
        kind: "dashboard",
        name_field: dashboard_name,
        description: "Error getting dashboard by name",
        query: r#"
            query getDashboardByName($spaceId: ID!, $dashboardName: String!) {
              node(id: $spaceId) {
                ... on Space {
                  dashboards(search: $dashboardName, first: 10) {
                    edges { node { id name status createdAt } }
                  }
                }
              }
            }
        "#,
    }
}
