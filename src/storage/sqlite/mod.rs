//! `SQLite` storage backend.
//!
//! ## Module Structure
//!
//! - [`connection`]: lock acquisition with poison recovery, pragma setup
//! - `schema`: idempotent table and index creation
//! - `row`: row to [`Suggestion`](crate::models::Suggestion) conversion
//! - `metrics`: per-operation counters and latency histograms
//! - `store`: [`SqliteSuggestionStore`]

pub mod connection;
mod metrics;
mod row;
mod schema;
mod store;

pub use connection::{acquire_lock, configure_connection};
pub use metrics::record_operation_metrics;
pub use row::parse_timestamp;
pub use schema::SCHEMA;
pub use store::SqliteSuggestionStore;
