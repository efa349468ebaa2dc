//! # Suggestbox
//!
//! A small suggestion box service: clients submit, list, update and delete
//! short suggestions (an author name plus free text) over a JSON HTTP API
//! backed by a single-file `SQLite` database. Any path outside the API is
//! served from a static asset directory.
//!
//! ## Layout
//!
//! - [`storage`]: the [`SuggestionStore`] trait and its `SQLite` backend
//! - [`http`]: router, CRUD handlers and the JSON response encoder
//! - [`models`]: the [`Suggestion`] record and its request bodies
//! - [`config`]: layered configuration (defaults, TOML file, CLI/env)
//! - [`observability`]: `tracing` subscriber and Prometheus metrics setup
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use suggestbox::http::router;
//! use suggestbox::storage::SqliteSuggestionStore;
//!
//! let store = SqliteSuggestionStore::open("/tmp/suggestions.db")?;
//! let app = router(Arc::new(store), "./static");
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod config;
pub mod http;
pub mod models;
pub mod observability;
pub mod storage;

pub use config::ServerConfig;
pub use models::{NewSuggestion, Patch, Suggestion, SuggestionDraft, SuggestionPatch};
pub use storage::{SqliteSuggestionStore, SuggestionStore};

/// Error type for suggestbox operations.
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Empty suggestion text, patch with no fields |
/// | `NotFound` | Update targets an id with no row |
/// | `OperationFailed` | I/O errors, `SQLite` failures, config parsing |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The addressed record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - `SQLite` open, schema, query or row decoding fails
    /// - The database directory cannot be created
    /// - A config file cannot be read or parsed
    /// - Logging or metrics cannot be installed
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for suggestbox operations.
pub type Result<T> = std::result::Result<T, Error>;
