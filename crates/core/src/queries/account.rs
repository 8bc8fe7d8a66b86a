//! Organization, space and user lookups.

use arize_domain::{Result, Space, User};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::OrganizationVariables;
use crate::graphql::descriptor::{require_non_empty, QueryDescriptor, Variables};
use crate::graphql::parse::{decode, value_at, Page, ParseFailure};

/// `{ organization, space }` by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrgAndSpaceNames {
    pub organization: String,
    pub space: String,
}

impl Variables for OrgAndSpaceNames {
    fn validate(&self) -> Result<()> {
        require_non_empty("organization", &self.organization)?;
        require_non_empty("space", &self.space)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgAndSpaceIds {
    pub organization_id: String,
    pub space_id: String,
}

#[derive(Debug, Deserialize)]
struct OrgNode {
    id: String,
    #[serde(default)]
    spaces: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct IdNode {
    id: String,
}

fn first_node(connection: Option<&Value>) -> Option<&Value> {
    connection?
        .get("edges")?
        .as_array()?
        .iter()
        .find_map(|edge| edge.get("node").filter(|node| !node.is_null()))
}

/// Resolve organization and space names to their ids.
pub struct OrgIdAndSpaceIdQuery;

impl QueryDescriptor for OrgIdAndSpaceIdQuery {
    type Variables = OrgAndSpaceNames;
    type Item = OrgAndSpaceIds;

    const NAME: &'static str = "OrgIdAndSpaceIdQuery";
    const DESCRIPTION: &'static str = "Error getting organization and space ids";
    const QUERY: &'static str = r#"
        query orgIDandSpaceID($organization: String!, $space: String!) {
          account {
            organizations(search: $organization, first: 1) {
              edges {
                node {
                  id
                  spaces(search: $space, first: 1) {
                    edges { node { id } }
                  }
                }
              }
            }
          }
        }
    "#;

    fn parse_page(data: &Value, variables: &OrgAndSpaceNames) -> std::result::Result<Page<OrgAndSpaceIds>, ParseFailure> {
        let organizations = value_at(data, &["account", "organizations"])?;
        let org_node = first_node(Some(organizations)).ok_or_else(|| {
            ParseFailure::NotFound(format!("organization '{}' not found", variables.organization))
        })?;
        let org: OrgNode = decode(org_node, "organization")?;

        let space_node = first_node(org.spaces.as_ref()).ok_or_else(|| {
            ParseFailure::NotFound(format!(
                "space '{}' not found in organization '{}'",
                variables.space, variables.organization
            ))
        })?;
        let space: IdNode = decode(space_node, "space")?;

        Ok(Page::single(OrgAndSpaceIds { organization_id: org.id, space_id: space.id }))
    }
}

connection_descriptor! {
    /// Every space in an organization.
    GetAllSpacesQuery {
        variables: OrganizationVariables,
        item: Space,
        path: ["node", "spaces"],
        description: "Error getting spaces",
        query: r#"
            query getAllSpaces($organizationId: ID!, $endCursor: String) {
              node(id: $organizationId) {
                ... on AccountOrganization {
                  spaces(first: 100, after: $endCursor) {
                    pageInfo { hasNextPage endCursor }
                    edges { node { id name createdAt private } }
                  }
                }
              }
            }
        "#,
    }
}

connection_descriptor! {
    /// Every user with access to an organization.
    GetAllUsersQuery {
        variables: OrganizationVariables,
        item: User,
        path: ["node", "users"],
        description: "Error getting users",
        query: r#"
            query getAllUsers($organizationId: ID!, $endCursor: String) {
              node(id: $organizationId) {
                ... on AccountOrganization {
                  users(first: 100, after: $endCursor) {
                    pageInfo { hasNextPage endCursor }
                    edges { node { id name email role } }
                  }
                }
              }
            }
        "#,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::graphql::parse::parse_response;

    fn names() -> OrgAndSpaceNames {
        OrgAndSpaceNames { organization: "acme".into(), space: "prod".into() }
    }

    #[test]
    fn resolves_first_organization_and_space() {
        let raw = json!({"data": {"account": {"organizations": {"edges": [
            {"node": {"id": "org_1", "spaces": {"edges": [{"node": {"id": "space_1"}}]}}}
        ]}}}});

        let page = parse_response::<OrgIdAndSpaceIdQuery>(&raw, &names()).unwrap();

        assert_eq!(
            page.items,
            vec![OrgAndSpaceIds { organization_id: "org_1".into(), space_id: "space_1".into() }]
        );
    }

    #[test]
    fn unknown_organization_is_not_found() {
        let raw = json!({"data": {"account": {"organizations": {"edges": []}}}});

        let err = parse_response::<OrgIdAndSpaceIdQuery>(&raw, &names()).unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().contains("organization 'acme' not found"));
    }

    #[test]
    fn unknown_space_is_not_found() {
        let raw = json!({"data": {"account": {"organizations": {"edges": [
            {"node": {"id": "org_1", "spaces": {"edges": []}}}
        ]}}}});

        let err = parse_response::<OrgIdAndSpaceIdQuery>(&raw, &names()).unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().contains("space 'prod' not found"));
    }
}
