//! # Arize Infrastructure
//!
//! I/O implementations of the core ports.
//!
//! This crate contains:
//! - HTTP clients (async with retry, blocking without) and the GraphQL
//!   transports built on them
//! - Profile/environment configuration loading
//! - The blocking and async domain clients
//! - The Phoenix → Arize migration engine (export, file formats, import,
//!   orchestration)
//!
//! ## Architecture
//! - Implements traits defined in `arize-core`
//! - Depends on `arize-domain`, `arize-common` and `arize-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod client;
pub mod config;
pub mod errors;
pub mod graphql;
pub mod http;
pub mod migration;

// Re-export commonly used items
pub use client::{ArizeClient, AsyncArizeClient};
pub use config::{load, ConfigSources};
pub use errors::InfraError;
pub use graphql::{AsyncHttpGraphQlTransport, HttpGraphQlTransport};
pub use http::{BlockingHttpClient, HttpClient, HttpClientBuilder};
pub use migration::{
    Exporter, GraphQlMigrationTarget, ImportSummary, Importer, MigrationService, PhoenixClient,
};
