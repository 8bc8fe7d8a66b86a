//! Phoenix migration ports and pure import bookkeeping

pub mod dedup;
pub mod ports;
pub mod spec;

pub use dedup::DuplicateTracker;
pub use ports::{MigrationTarget, PhoenixSource};
pub use spec::ImportSpec;
