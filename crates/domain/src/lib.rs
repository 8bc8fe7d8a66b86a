//! # Arize Domain
//!
//! Platform records and error types shared by every Arize toolkit crate.
//!
//! This crate contains:
//! - Schema records for models, monitors, prompts, dashboards, custom
//!   metrics, evaluators and import jobs
//! - Migration job bookkeeping (status state machine, per-type results)
//! - The domain error taxonomy and `Result` alias
//! - Configuration structures (profile credentials, client and migration
//!   knobs)
//!
//! ## Architecture
//! - No dependencies on other toolkit crates
//! - Only serialization and time/uuid dependencies
//! - Pure data structures; no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
