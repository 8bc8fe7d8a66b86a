//! Wire request construction.

use arize_domain::{ArizeError, Result};
use serde::Serialize;
use serde_json::{Map, Value};

use super::descriptor::QueryDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

/// POST body sent to the GraphQL endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQlRequest {
    pub query: String,
    pub variables: Value,
}

impl GraphQlRequest {
    /// Bind `variables` (and an optional page cursor) to `D`'s document.
    ///
    /// Queries send variables at the top level; mutations wrap the whole bag
    /// in a single `input` key. The cursor is passed through verbatim as
    /// `endCursor`.
    pub fn build<D: QueryDescriptor>(
        variables: &D::Variables,
        cursor: Option<&str>,
    ) -> Result<Self> {
        let mut bag = match serde_json::to_value(variables)? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(ArizeError::Validation(format!(
                    "{} variables must serialize to an object, got {other}",
                    D::NAME
                )))
            }
        };

        let variables = match D::KIND {
            OperationKind::Query => {
                if let Some(cursor) = cursor {
                    bag.insert("endCursor".to_string(), Value::String(cursor.to_string()));
                }
                Value::Object(bag)
            }
            OperationKind::Mutation => {
                let mut wrapped = Map::new();
                wrapped.insert("input".to_string(), Value::Object(bag));
                Value::Object(wrapped)
            }
        };

        Ok(Self { query: D::QUERY.to_string(), variables })
    }
}
