//! Data models for suggestbox.

mod suggestion;

pub use suggestion::{
    NewSuggestion, PLACEHOLDER_NAME, Patch, Suggestion, SuggestionChanges, SuggestionDraft,
    SuggestionPatch, ValidationError,
};
