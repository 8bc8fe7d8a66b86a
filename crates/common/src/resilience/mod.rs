//! Resilience patterns for transient failures
//!
//! Only retry with backoff lives here. The GraphQL executor does
//! not retry; callers that tolerate transient failures (the Phoenix
//! migration engine) wrap their remote calls with [`retry_operation`].

pub mod retry;

pub use retry::{
    retry_operation, retry_operation_if, BackoffStrategy, RetryConfig, RetryConfigBuilder,
};
