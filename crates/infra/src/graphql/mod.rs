//! reqwest-backed GraphQL transports

pub mod transport;

pub use transport::{AsyncHttpGraphQlTransport, HttpGraphQlTransport};
