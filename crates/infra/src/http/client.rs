//! Async HTTP client with timeout, credentials and status mapping.

use std::time::Duration;

use arize_domain::constants::API_KEY_HEADER;
use arize_domain::{ArizeError, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::errors::conversions::{status_error, to_domain};

/// reqwest client that sends each request exactly once.
///
/// Retrying is the caller's decision; the migration engine wraps its calls
/// in `arize_common::retry_operation`.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the request. Non-2xx responses are returned as-is; use
    /// [`HttpClient::send_json`] for status checking.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build().map_err(to_domain)?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        let response = self.client.execute(request).await.map_err(to_domain)?;
        debug!(%method, %url, status = %response.status(), "received HTTP response");
        Ok(response)
    }

    /// Send and decode a JSON body; non-2xx becomes `Auth` or `Network`.
    pub async fn send_json(&self, builder: RequestBuilder) -> Result<Value> {
        let response = self.send(builder).await?;
        decode_json(response).await
    }

    /// Like [`HttpClient::send_json`], but a 404 is `Ok(None)`.
    pub async fn send_json_optional(&self, builder: RequestBuilder) -> Result<Option<Value>> {
        let response = self.send(builder).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode_json(response).await.map(Some)
    }
}

async fn decode_json(response: Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status, &body));
    }
    response.json::<Value>().await.map_err(to_domain)
}

/// Build a header value that is redacted from `Debug` output.
pub(crate) fn sensitive_header_value(value: &str) -> Result<HeaderValue> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|_| ArizeError::Config("credential contains invalid header characters".into()))?;
    header.set_sensitive(true);
    Ok(header)
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    headers: HeaderMap,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), headers: HeaderMap::new() }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send `x-api-key` on every request.
    pub fn api_key(self, api_key: &str) -> Result<Self> {
        self.secret_header(API_KEY_HEADER, api_key)
    }

    /// Send `Authorization: Bearer <token>` on every request.
    pub fn bearer_token(self, token: &str) -> Result<Self> {
        self.secret_header("authorization", &format!("Bearer {token}"))
    }

    fn secret_header(mut self, name: &'static str, value: &str) -> Result<Self> {
        self.headers.insert(name, sensitive_header_value(value)?);
        Ok(self)
    }

    pub fn build(self) -> Result<HttpClient> {
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .default_headers(self.headers)
            .no_proxy()
            .build()
            .map_err(to_domain)?;

        Ok(HttpClient { client })
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use serde_json::json;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client() -> HttpClient {
        HttpClient::builder().timeout(Duration::from_secs(5)).build().expect("http client")
    }

    #[tokio::test]
    async fn server_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client();
        let err = client.send_json(client.request(Method::GET, server.uri())).await.unwrap_err();

        assert_eq!(err, ArizeError::Network("HTTP 503 Service Unavailable: maintenance".into()));
    }

    #[tokio::test]
    async fn unauthorized_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let client = client();
        let err = client.send_json(client.request(Method::GET, server.uri())).await.unwrap_err();

        assert!(err.is_auth());
    }

    #[tokio::test]
    async fn not_found_is_none_for_optional_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(404)).mount(&server).await;

        let client = client();
        let body = client
            .send_json_optional(client.request(Method::GET, server.uri()))
            .await
            .expect("response");

        assert!(body.is_none());
    }

    #[tokio::test]
    async fn connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client();
        let result = client.send(client.request(Method::GET, format!("http://{addr}"))).await;

        match result {
            Err(ArizeError::Network(msg)) => assert!(msg.to_lowercase().contains("http")),
            other => panic!("expected network error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn api_key_is_sent_on_every_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("x-api-key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(2)
            .mount(&server)
            .await;

        let client = HttpClient::builder().api_key("secret").unwrap().build().unwrap();
        for _ in 0..2 {
            client.send_json(client.request(Method::GET, server.uri())).await.expect("body");
        }
    }

    #[test]
    fn rejects_header_values_with_newlines() {
        let err = HttpClient::builder().api_key("bad\nkey").unwrap_err();
        assert!(matches!(err, ArizeError::Config(_)));
    }
}
