//! GraphQL transports over HTTP
//!
//! Both transports POST `{query, variables}` to `<app_url>/graphql` with the
//! `x-api-key` header and hand back the raw JSON body. They never retry and
//! never inspect the GraphQL `errors` array; that is the shared parser's job.

use arize_core::graphql::ports::{AsyncGraphQlTransport, GraphQlTransport};
use arize_core::GraphQlRequest;
use arize_domain::{ArizeConfig, ClientOptions, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::http::{BlockingHttpClient, HttpClient};

/// Blocking transport for [`crate::client::ArizeClient`].
pub struct HttpGraphQlTransport {
    http: BlockingHttpClient,
    endpoint: String,
}

impl HttpGraphQlTransport {
    pub fn new(config: &ArizeConfig, options: &ClientOptions) -> Result<Self> {
        Ok(Self {
            http: BlockingHttpClient::new(options.timeout, &config.api_key)?,
            endpoint: config.graphql_url(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl GraphQlTransport for HttpGraphQlTransport {
    fn execute(&self, request: &GraphQlRequest) -> Result<Value> {
        self.http.send_json(self.http.request(Method::POST, &self.endpoint).json(request))
    }
}

/// Non-blocking transport for [`crate::client::AsyncArizeClient`].
pub struct AsyncHttpGraphQlTransport {
    http: HttpClient,
    endpoint: String,
}

impl AsyncHttpGraphQlTransport {
    pub fn new(config: &ArizeConfig, options: &ClientOptions) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(options.timeout)
            .api_key(&config.api_key)?
            .build()?;
        Ok(Self { http, endpoint: config.graphql_url() })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AsyncGraphQlTransport for AsyncHttpGraphQlTransport {
    async fn execute(&self, request: &GraphQlRequest) -> Result<Value> {
        self.http.send_json(self.http.request(Method::POST, &self.endpoint).json(request)).await
    }
}
