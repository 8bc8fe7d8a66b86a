//! GraphQL query descriptors and their executors
//!
//! A [`QueryDescriptor`] is a static definition of one operation: the
//! document, the typed variables, the typed result item and a description
//! used as the prefix of every error it raises. Execution is split into:
//!
//! - [`GraphQlRequest::build`] - variables → wire request
//! - [`parse::parse_response`] - raw wire response → [`Page`], shared by
//!   both executors
//! - [`executor`] (blocking) and [`async_executor`] (tokio) - transport
//!   calls, page iteration and pacing

pub mod async_executor;
pub mod descriptor;
pub mod executor;
pub mod parse;
pub mod ports;
pub mod request;

pub use descriptor::{from_json, require_non_empty, NoVariables, QueryDescriptor, Variables};
pub use executor::PaginationOptions;
pub use parse::{Page, ParseFailure};
pub use request::{GraphQlRequest, OperationKind};
