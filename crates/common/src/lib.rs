//! Modular common utilities shared across the Arize toolkit crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: stable content hashing over JSON records
//! - `runtime`: async retry with exponential backoff (tokio timer)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod hash;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod resilience;

#[cfg(feature = "foundation")]
pub use hash::{content_hash, field_value_string};
#[cfg(feature = "runtime")]
pub use resilience::{
    retry_operation, retry_operation_if, BackoffStrategy, RetryConfig, RetryConfigBuilder,
};
