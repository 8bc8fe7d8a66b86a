//! Phoenix REST client
//!
//! Implements [`PhoenixSource`] over the `/v1` API. Collection pages are
//! JSON objects whose pluralized key (or `data`) holds the items; a bare
//! array body is accepted too. Requests are not retried here: the exporter
//! owns the retry policy.

use std::time::Duration;

use arize_core::PhoenixSource;
use arize_domain::{ArizeError, DataType, ExportFilters, MigrationConfig, Result};
use async_trait::async_trait;
use reqwest::{Method, Url};
use serde_json::Value;
use tracing::debug;

use super::exporter::details_key;
use crate::http::HttpClient;

pub struct PhoenixClient {
    http: HttpClient,
    base_url: Url,
}

impl PhoenixClient {
    pub fn new(config: &MigrationConfig) -> Result<Self> {
        let mut builder = HttpClient::builder().timeout(Duration::from_secs(60));
        if let Some(key) = config.phoenix_api_key.as_deref() {
            builder = builder.bearer_token(key)?;
        }
        Self::with_http(builder.build()?, &config.phoenix_url)
    }

    pub fn with_http(http: HttpClient, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ArizeError::Config(format!("invalid Phoenix URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ArizeError::Config(format!("invalid Phoenix URL '{base_url}'")));
        }
        Ok(Self { http, base_url })
    }

    /// `<base>/v1/<segments…>` with every segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ArizeError::Config(format!("invalid Phoenix URL '{}'", self.base_url)))?
            .pop_if_empty()
            .push("v1")
            .extend(segments);
        Ok(url)
    }
}

/// Items of a page body: `{<key>: [...]}`, `{data: [...]}` or `[...]`.
fn page_items(body: Value, key: &str) -> Result<Vec<Value>> {
    let items = match body {
        Value::Array(items) => return Ok(items),
        Value::Null => return Ok(Vec::new()),
        Value::Object(mut map) => map.remove(key).or_else(|| map.remove("data")),
        other => {
            return Err(ArizeError::Serialization(format!(
                "expected an object or array for {key}, got {other}"
            )))
        }
    };
    match items {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(ArizeError::Serialization(format!("{key} is not an array: {other}"))),
    }
}

fn record_id<'a>(item: &'a Value, fields: &[&str]) -> Option<&'a str> {
    fields.iter().find_map(|field| item.get(*field).and_then(Value::as_str))
}

#[async_trait]
impl PhoenixSource for PhoenixClient {
    async fn get_project(&self, project: &str) -> Result<Option<Value>> {
        let url = self.endpoint(&["projects", project])?;
        self.http.send_json_optional(self.http.request(Method::GET, url)).await
    }

    async fn fetch_page(
        &self,
        project: &str,
        data_type: DataType,
        page: u32,
        page_size: u32,
        filters: &ExportFilters,
    ) -> Result<Vec<Value>> {
        let key = data_type.collection_key();
        let url = self.endpoint(&["projects", project, key])?;

        let mut query = vec![("page", page.to_string()), ("page_size", page_size.to_string())];
        if let Some(since) = filters.since {
            query.push(("start_time", since.to_rfc3339()));
        }
        if let Some(until) = filters.until {
            query.push(("end_time", until.to_rfc3339()));
        }

        debug!(project, data_type = %data_type, page, page_size, "fetching Phoenix page");
        let body = self.http.send_json(self.http.request(Method::GET, url).query(&query)).await?;
        page_items(body, key)
    }

    async fn fetch_details(&self, data_type: DataType, item: &Value) -> Result<Option<Value>> {
        let Some(resource) = details_key(data_type) else {
            return Ok(None);
        };
        let id_fields: &[&str] = match data_type {
            DataType::Traces => &["trace_id", "id"],
            _ => &["id"],
        };
        let Some(id) = record_id(item, id_fields) else {
            return Ok(None);
        };

        let url = self.endpoint(&[data_type.collection_key(), id, resource])?;
        match self.http.send_json_optional(self.http.request(Method::GET, url)).await? {
            Some(body) => Ok(Some(Value::Array(page_items(body, resource)?))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(server: &MockServer, api_key: Option<&str>) -> PhoenixClient {
        let config = MigrationConfig {
            phoenix_url: server.uri(),
            phoenix_api_key: api_key.map(str::to_string),
            ..Default::default()
        };
        PhoenixClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn missing_project_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/projects/ghost"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert_eq!(client(&server, None).get_project("ghost").await.unwrap(), None);
    }

    #[tokio::test]
    async fn page_reads_pluralized_key_with_paging_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/projects/my%20app/traces"))
            .and(query_param("page", "2"))
            .and(query_param("page_size", "50"))
            .and(header("authorization", "Bearer px-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "traces": [{"trace_id": "t1"}, {"trace_id": "t2"}]
            })))
            .mount(&server)
            .await;

        let items = client(&server, Some("px-key"))
            .fetch_page("my app", DataType::Traces, 2, 50, &ExportFilters::default())
            .await
            .unwrap();

        assert_eq!(items, vec![json!({"trace_id": "t1"}), json!({"trace_id": "t2"})]);
    }

    #[tokio::test]
    async fn page_falls_back_to_data_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/projects/demo/datasets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": "d1"}]})))
            .mount(&server)
            .await;

        let items = client(&server, None)
            .fetch_page("demo", DataType::Datasets, 1, 100, &ExportFilters::default())
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn dataset_details_are_its_examples() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/datasets/d1/examples"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "examples": [{"input": "q"}]
            })))
            .mount(&server)
            .await;

        let client = client(&server, None);
        let details = client.fetch_details(DataType::Datasets, &json!({"id": "d1"})).await.unwrap();
        assert_eq!(details, Some(json!([{"input": "q"}])));

        let none = client.fetch_details(DataType::Annotations, &json!({"id": "a1"})).await.unwrap();
        assert_eq!(none, None);
    }

    #[test]
    fn non_array_collection_is_rejected() {
        let err = page_items(json!({"prompts": {"oops": true}}), "prompts").unwrap_err();
        assert!(matches!(err, ArizeError::Serialization(_)));
    }
}
