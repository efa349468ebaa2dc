//! Storage trait definition.

use crate::Result;
use crate::models::{Suggestion, SuggestionChanges, SuggestionDraft};

/// Trait for suggestion storage backends.
///
/// Implementations own id assignment and timestamp generation. Each method
/// is a single statement; callers that need the stored row after a write
/// follow up with [`SuggestionStore::get`].
pub trait SuggestionStore: Send + Sync {
    /// Lists every suggestion, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or any row cannot be decoded.
    /// Partial results are never returned.
    fn list(&self) -> Result<Vec<Suggestion>>;

    /// Gets a suggestion by id.
    ///
    /// # Returns
    ///
    /// The suggestion if found, `None` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be accessed.
    fn get(&self, id: i64) -> Result<Option<Suggestion>>;

    /// Inserts a new suggestion.
    ///
    /// # Returns
    ///
    /// The id assigned by the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot be inserted.
    fn insert(&self, draft: &SuggestionDraft) -> Result<i64>;

    /// Applies `changes` to the suggestion with `id` and refreshes its
    /// `updated_at`.
    ///
    /// # Returns
    ///
    /// True if a row was updated, false if no row has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be accessed.
    fn update(&self, id: i64, changes: &SuggestionChanges) -> Result<bool>;

    /// Deletes a suggestion by id.
    ///
    /// # Returns
    ///
    /// True if deleted, false if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be accessed.
    fn delete(&self, id: i64) -> Result<bool>;
}
