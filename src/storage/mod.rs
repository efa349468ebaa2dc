//! Storage layer.
//!
//! Handlers depend only on the [`SuggestionStore`] trait; the process wires
//! in [`SqliteSuggestionStore`] at startup and tests substitute their own.

// Dropping the connection guard slightly early provides no meaningful benefit.
#![allow(clippy::significant_drop_tightening)]

pub mod sqlite;
mod traits;

pub use sqlite::SqliteSuggestionStore;
pub use traits::SuggestionStore;
