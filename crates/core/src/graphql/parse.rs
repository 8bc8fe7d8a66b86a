//! Response parsing shared by the sync and async executors.

use arize_domain::{ArizeError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::descriptor::QueryDescriptor;

/// One page of parsed items plus the server's continuation state.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

impl<T> Page<T> {
    /// A terminal page holding exactly one item.
    pub fn single(item: T) -> Self {
        Self { items: vec![item], has_next_page: false, end_cursor: None }
    }

    /// A terminal page.
    pub fn last(items: Vec<T>) -> Self {
        Self { items, has_next_page: false, end_cursor: None }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            has_next_page: self.has_next_page,
            end_cursor: self.end_cursor,
        }
    }
}

/// Why a descriptor could not extract its page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// The expected node was absent or null
    NotFound(String),
    /// The response did not have the declared shape
    Malformed(String),
}

impl ParseFailure {
    fn into_error(self, description: &str) -> ArizeError {
        match self {
            Self::NotFound(detail) => ArizeError::not_found(description, detail),
            Self::Malformed(detail) => ArizeError::query(description, detail),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorEntry {
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    #[serde(default)]
    has_next_page: bool,
    #[serde(default)]
    end_cursor: Option<String>,
}

/// Turn a raw wire response into `D`'s page.
///
/// A non-empty top-level `errors` array wins over any partial `data`. All
/// failures are prefixed with `D::DESCRIPTION`.
pub fn parse_response<D: QueryDescriptor>(
    raw: &Value,
    variables: &D::Variables,
) -> Result<Page<D::Item>> {
    if let Some(errors) = raw.get("errors").filter(|e| !e.is_null()) {
        let messages: Vec<String> = match errors {
            Value::Array(entries) if entries.is_empty() => Vec::new(),
            Value::Array(entries) => entries
                .iter()
                .map(|entry| {
                    serde_json::from_value::<GraphQlErrorEntry>(entry.clone())
                        .map(|e| e.message)
                        .unwrap_or_else(|_| entry.to_string())
                })
                .collect(),
            other => vec![other.to_string()],
        };
        if !messages.is_empty() {
            return Err(ArizeError::query(
                D::DESCRIPTION,
                format!("GraphQL errors: {}", messages.join("; ")),
            ));
        }
    }

    let data = match raw.get("data") {
        Some(data) if !data.is_null() => data,
        _ => return Err(ArizeError::query(D::DESCRIPTION, "response missing data field")),
    };

    D::parse_page(data, variables).map_err(|failure| failure.into_error(D::DESCRIPTION))
}

/// Follow `path` from `root`; a missing or null segment is `NotFound`.
pub fn value_at<'a>(root: &'a Value, path: &[&str]) -> std::result::Result<&'a Value, ParseFailure> {
    let mut current = root;
    for (depth, segment) in path.iter().enumerate() {
        current = match current.get(*segment) {
            Some(value) if !value.is_null() => value,
            _ => {
                return Err(ParseFailure::NotFound(format!(
                    "{} not found in response",
                    path[..=depth].join(".")
                )))
            }
        };
    }
    Ok(current)
}

/// Deserialize a value into `T`, reporting shape errors as `Malformed`.
pub fn decode<T: DeserializeOwned>(value: &Value, what: &str) -> std::result::Result<T, ParseFailure> {
    T::deserialize(value).map_err(|e| ParseFailure::Malformed(format!("invalid {what}: {e}")))
}

/// Default node-by-id lookup: `data.node` as one item.
pub fn node_item<T: DeserializeOwned>(data: &Value) -> std::result::Result<T, ParseFailure> {
    let node = value_at(data, &["node"])?;
    decode(node, "node")
}

/// Unwrap a relay connection (`edges[].node` + `pageInfo`) found at `path`.
pub fn connection_page<T: DeserializeOwned>(
    data: &Value,
    path: &[&str],
) -> std::result::Result<Page<T>, ParseFailure> {
    let connection = value_at(data, path)?;
    let edges = match connection.get("edges") {
        Some(Value::Array(edges)) => edges.as_slice(),
        Some(Value::Null) | None => &[],
        Some(_) => {
            return Err(ParseFailure::Malformed(format!("{}.edges is not a list", path.join("."))))
        }
    };

    let items = edges
        .iter()
        .filter_map(|edge| edge.get("node").filter(|node| !node.is_null()))
        .map(|node| decode(node, "edge node"))
        .collect::<std::result::Result<Vec<T>, _>>()?;

    let page_info: PageInfo = match connection.get("pageInfo") {
        Some(info) if !info.is_null() => decode(info, "pageInfo")?,
        _ => PageInfo::default(),
    };

    Ok(Page { items, has_next_page: page_info.has_next_page, end_cursor: page_info.end_cursor })
}

/// Pick the item whose name matches `name` exactly from a search connection.
///
/// Server-side search is fuzzy, so a non-exact hit is treated as absent.
pub fn find_named<T, F>(
    data: &Value,
    path: &[&str],
    kind: &str,
    name: &str,
    name_of: F,
) -> std::result::Result<Page<T>, ParseFailure>
where
    T: DeserializeOwned,
    F: Fn(&T) -> &str,
{
    let page: Page<T> = connection_page(data, path)?;
    page.items
        .into_iter()
        .find(|item| name_of(item) == name)
        .map(Page::single)
        .ok_or_else(|| ParseFailure::NotFound(format!("{kind} '{name}' not found")))
}

/// Decode a mutation's payload object at `path`.
pub fn mutation_payload<T: DeserializeOwned>(
    data: &Value,
    path: &[&str],
) -> std::result::Result<Page<T>, ParseFailure> {
    let payload = value_at(data, path)
        .map_err(|_| ParseFailure::Malformed(format!("{} returned no payload", path.join("."))))?;
    decode(payload, path.join(".").as_str()).map(Page::single)
}

/// A mutation succeeded when its payload field is present and non-null.
pub fn mutation_ack(data: &Value, field: &str) -> std::result::Result<Page<bool>, ParseFailure> {
    value_at(data, &[field])
        .map(|_| Page::single(true))
        .map_err(|_| ParseFailure::Malformed(format!("{field} returned no payload")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        id: String,
        name: String,
    }

    #[test]
    fn connection_page_reads_edges_and_page_info() {
        let data = json!({
            "node": {"models": {
                "pageInfo": {"hasNextPage": true, "endCursor": "abc"},
                "edges": [
                    {"node": {"id": "1", "name": "a"}},
                    {"node": {"id": "2", "name": "b"}}
                ]
            }}
        });

        let page: Page<Named> = connection_page(&data, &["node", "models"]).unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(page.has_next_page);
        assert_eq!(page.end_cursor.as_deref(), Some("abc"));
    }

    #[test]
    fn missing_connection_is_not_found() {
        let data = json!({"node": null});
        let err = connection_page::<Named>(&data, &["node", "models"]).unwrap_err();
        assert_eq!(err, ParseFailure::NotFound("node not found in response".into()));
    }

    #[test]
    fn missing_page_info_terminates() {
        let data = json!({"list": {"edges": [{"node": {"id": "1", "name": "a"}}]}});
        let page: Page<Named> = connection_page(&data, &["list"]).unwrap();
        assert!(!page.has_next_page);
        assert!(page.end_cursor.is_none());
    }

    #[test]
    fn find_named_requires_exact_match() {
        let data = json!({"list": {"edges": [
            {"node": {"id": "1", "name": "churn-v2"}},
            {"node": {"id": "2", "name": "churn"}}
        ]}});

        let page = find_named(&data, &["list"], "model", "churn", |m: &Named| m.name.as_str()).unwrap();
        assert_eq!(page.items[0].id, "2");

        let err = find_named(&data, &["list"], "model", "churn-v3", |m: &Named| m.name.as_str()).unwrap_err();
        assert_eq!(err, ParseFailure::NotFound("model 'churn-v3' not found".into()));
    }

    #[test]
    fn malformed_node_is_reported() {
        let data = json!({"node": {"id": 5}});
        let err = node_item::<Named>(&data).unwrap_err();
        assert!(matches!(err, ParseFailure::Malformed(_)));
    }

    #[test]
    fn mutation_ack_requires_payload() {
        assert_eq!(mutation_ack(&json!({"deleteMonitor": {"monitor": {"id": "m"}}}), "deleteMonitor").unwrap().items, vec![true]);
        assert!(mutation_ack(&json!({"deleteMonitor": null}), "deleteMonitor").is_err());
    }
}
