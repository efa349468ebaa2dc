//! Suggestion record and request bodies.
//!
//! Create and update bodies are decoded into [`NewSuggestion`] and
//! [`SuggestionPatch`], then normalized into [`SuggestionDraft`] and
//! [`SuggestionChanges`]. Only the normalized forms reach the store, so
//! trimming, the placeholder name and the non-empty rules are applied in
//! exactly one place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error as ThisError;

/// Name stored when a suggestion is submitted without an author.
pub const PLACEHOLDER_NAME: &str = "Anonymous";

/// A stored suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Store-assigned identifier.
    pub id: i64,
    /// Author label.
    pub name: String,
    /// Suggestion text.
    pub suggestion: String,
    /// Insertion time.
    pub created_at: DateTime<Utc>,
    /// Last successful update (equals `created_at` until the first update).
    pub updated_at: DateTime<Utc>,
}

/// Validation failures for request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum ValidationError {
    /// The suggestion text is empty after trimming.
    #[error("suggestion required")]
    SuggestionRequired,
    /// An update body carries neither `name` nor `suggestion`.
    #[error("no fields to update")]
    NoFieldsToUpdate,
}

impl From<ValidationError> for crate::Error {
    fn from(err: ValidationError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

/// Body of a create request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewSuggestion {
    /// Optional author label.
    pub name: Option<String>,
    /// Suggestion text.
    pub suggestion: Option<String>,
}

impl NewSuggestion {
    /// Creates a create body from its two fields.
    #[must_use]
    pub fn new(name: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            suggestion: Some(suggestion.into()),
        }
    }

    /// Trims both fields and applies the placeholder name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::SuggestionRequired`] if the suggestion is
    /// missing or blank.
    pub fn normalize(self) -> Result<SuggestionDraft, ValidationError> {
        let suggestion = self
            .suggestion
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        if suggestion.is_empty() {
            return Err(ValidationError::SuggestionRequired);
        }

        Ok(SuggestionDraft {
            name: normalize_name(self.name.as_deref().unwrap_or_default()),
            suggestion: suggestion.to_string(),
        })
    }
}

/// A validated suggestion ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionDraft {
    name: String,
    suggestion: String,
}

impl SuggestionDraft {
    /// Author label, never empty.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Suggestion text, never blank.
    #[must_use]
    pub fn suggestion(&self) -> &str {
        &self.suggestion
    }
}

/// Presence of a single field in a partial update.
///
/// A field missing from the body and a field sent as JSON `null` both
/// decode to [`Patch::Keep`]. Any string, including `""`, decodes to
/// [`Patch::Set`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// Leave the stored value unchanged.
    #[default]
    Keep,
    /// Replace the stored value.
    Set(T),
}

impl<T> Patch<T> {
    /// Returns `true` if the field was supplied.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    /// Converts into an `Option`, `None` meaning "keep".
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Keep => None,
            Self::Set(value) => Some(value),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Keep, Self::Set)
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

/// Body of an update request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SuggestionPatch {
    /// New author label.
    pub name: Patch<String>,
    /// New suggestion text.
    pub suggestion: Patch<String>,
}

impl SuggestionPatch {
    /// Trims the supplied fields and checks that at least one is present.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::SuggestionRequired`] if `suggestion` is
    /// supplied but blank, or [`ValidationError::NoFieldsToUpdate`] if
    /// neither field is supplied.
    pub fn normalize(self) -> Result<SuggestionChanges, ValidationError> {
        let name = self.name.into_option().map(|n| normalize_name(&n));

        let suggestion = match self.suggestion {
            Patch::Keep => None,
            Patch::Set(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::SuggestionRequired);
                }
                Some(trimmed.to_string())
            },
        };

        if name.is_none() && suggestion.is_none() {
            return Err(ValidationError::NoFieldsToUpdate);
        }

        Ok(SuggestionChanges { name, suggestion })
    }
}

/// A validated, non-empty set of field changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionChanges {
    name: Option<String>,
    suggestion: Option<String>,
}

impl SuggestionChanges {
    /// New author label, if it changes.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// New suggestion text, if it changes.
    #[must_use]
    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }
}

fn normalize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        PLACEHOLDER_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}
