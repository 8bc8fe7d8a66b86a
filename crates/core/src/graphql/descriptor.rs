//! The query descriptor contract.

use arize_domain::{ArizeError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::parse::{node_item, Page, ParseFailure};
use super::request::OperationKind;

/// A validated bag of inputs bound to one descriptor.
///
/// Structural requirements (presence, types, unknown keys) are enforced by
/// serde; `validate` covers the semantic ones (non-empty ids, mutually
/// required fields). Executors call it before anything touches a transport.
pub trait Variables: Serialize + Send + Sync {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// A static definition of one GraphQL operation.
pub trait QueryDescriptor {
    type Variables: Variables;
    type Item: DeserializeOwned + Send;

    /// Type name, used in logs
    const NAME: &'static str;
    /// GraphQL document; paginated operations declare `$endCursor: String`
    const QUERY: &'static str;
    /// Human-readable prefix for every error this descriptor raises
    const DESCRIPTION: &'static str;
    const KIND: OperationKind = OperationKind::Query;

    /// Extract one page of items from the response's `data` object.
    ///
    /// The default resolves a single item from `data.node`.
    fn parse_page(
        data: &Value,
        _variables: &Self::Variables,
    ) -> std::result::Result<Page<Self::Item>, ParseFailure> {
        node_item(data).map(Page::single)
    }
}

/// Variables for operations that take no input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoVariables {}

impl Variables for NoVariables {}

/// Build typed variables from a loose JSON object (keyword-argument style).
///
/// Missing required keys, wrong types and unknown keys are all
/// [`ArizeError::Validation`].
pub fn from_json<V>(value: Value) -> Result<V>
where
    V: Variables + DeserializeOwned,
{
    let variables: V = serde_json::from_value(value)
        .map_err(|e| ArizeError::Validation(format!("invalid variables: {e}")))?;
    variables.validate()?;
    Ok(variables)
}

/// Reject empty or whitespace-only required string inputs.
pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ArizeError::Validation(format!("{field} is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", deny_unknown_fields)]
    struct ModelVars {
        model_id: String,
        #[serde(default)]
        limit: Option<u32>,
    }

    impl Variables for ModelVars {
        fn validate(&self) -> Result<()> {
            require_non_empty("modelId", &self.model_id)
        }
    }

    #[test]
    fn from_json_accepts_declared_fields() {
        let vars: ModelVars = from_json(json!({"modelId": "m1", "limit": 5})).unwrap();
        assert_eq!(vars.model_id, "m1");
        assert_eq!(vars.limit, Some(5));
    }

    #[test]
    fn from_json_rejects_missing_required_field() {
        let err = from_json::<ModelVars>(json!({"limit": 5})).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("modelId"));
    }

    #[test]
    fn from_json_rejects_unknown_field() {
        let err = from_json::<ModelVars>(json!({"modelId": "m1", "extra": true})).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn from_json_runs_semantic_validation() {
        let err = from_json::<ModelVars>(json!({"modelId": "  "})).unwrap_err();
        assert_eq!(err, ArizeError::Validation("modelId is required".into()));
    }
}
