//! HTTP clients over reqwest
//!
//! [`HttpClient`] is the async client with optional retry on connection
//! failures and 5xx responses; [`BlockingHttpClient`] is the thread-blocking
//! counterpart used by the synchronous domain client.

pub mod blocking;
pub mod client;

pub use blocking::BlockingHttpClient;
pub use client::{HttpClient, HttpClientBuilder};
