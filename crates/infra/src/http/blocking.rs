//! Thread-blocking HTTP client.
//!
//! `reqwest::blocking` runs its own runtime internally, so a
//! [`BlockingHttpClient`] must not be created or dropped inside an async
//! context.

use std::time::Duration;

use arize_domain::constants::API_KEY_HEADER;
use arize_domain::Result;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use super::client::sensitive_header_value;
use crate::errors::conversions::{status_error, to_domain};

/// Blocking counterpart of [`super::HttpClient`], without retry.
#[derive(Clone)]
pub struct BlockingHttpClient {
    client: Client,
}

impl BlockingHttpClient {
    pub fn new(timeout: Duration, api_key: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, sensitive_header_value(api_key)?);

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .no_proxy()
            .build()
            .map_err(to_domain)?;
        Ok(Self { client })
    }

    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Send and decode a JSON body; non-2xx becomes `Auth` or `Network`.
    pub fn send_json(&self, builder: RequestBuilder) -> Result<Value> {
        let response = builder.send().map_err(to_domain)?;
        let status = response.status();
        debug!(%status, url = %response.url(), "received HTTP response");

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(status_error(status, &body));
        }
        response.json::<Value>().map_err(to_domain)
    }
}
