//! Transport ports
//!
//! Both transports return the raw JSON body of a 2xx response. Anything
//! else (connection failure, timeout, non-2xx status) is an `Err`; the
//! executors re-wrap it as a query error for the calling descriptor.

use arize_domain::Result;
use async_trait::async_trait;
use serde_json::Value;

use super::request::GraphQlRequest;

/// Blocking transport: occupies the calling thread until the response.
pub trait GraphQlTransport {
    fn execute(&self, request: &GraphQlRequest) -> Result<Value>;
}

/// Non-blocking transport: every call is a suspension point.
#[async_trait]
pub trait AsyncGraphQlTransport: Send + Sync {
    async fn execute(&self, request: &GraphQlRequest) -> Result<Value>;
}
