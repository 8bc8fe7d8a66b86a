//! # Arize Core
//!
//! Pure request/response logic - no HTTP, file or platform code.
//!
//! This crate contains:
//! - The query descriptor contract and the shared response parser
//! - Sync and async executors (single, list, cursor-paginated) over
//!   transport ports
//! - The catalogue of platform queries and mutations
//! - Migration ports and the duplicate tracker used by the importer
//!
//! ## Architecture Principles
//! - Only depends on `arize-domain` and `arize-common`
//! - Transports and migration endpoints are traits implemented in
//!   `arize-infra`
//! - Descriptors are stateless and safe to share across calls

pub mod graphql;
pub mod migration;
pub mod queries;

// Re-export specific items to avoid ambiguity
pub use graphql::ports::{AsyncGraphQlTransport, GraphQlTransport};
pub use graphql::{
    GraphQlRequest, OperationKind, Page, PaginationOptions, ParseFailure, QueryDescriptor,
    Variables,
};
pub use migration::dedup::DuplicateTracker;
pub use migration::ports::{MigrationTarget, PhoenixSource};
pub use migration::spec::ImportSpec;
