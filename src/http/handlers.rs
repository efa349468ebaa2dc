//! CRUD handlers for the suggestions API.
//!
//! Each handler decodes its input, calls the store on the blocking pool,
//! and turns the outcome into a response. Writes are followed by a separate
//! read of the stored row; the two calls are not atomic.

use super::json::respond_json;
use super::{ApiError, AppState};
use crate::models::{NewSuggestion, SuggestionPatch};
use crate::storage::SuggestionStore;
use crate::Error;
use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// `GET /api/suggestions`
pub async fn list_suggestions(state: AppState) -> Result<Response, ApiError> {
    let suggestions = run_blocking(state.store(), |store| store.list())
        .await
        .map_err(|e| ApiError::internal(&e, "query error"))?;

    debug!(count = suggestions.len(), "listed suggestions");
    Ok(respond_json(&suggestions))
}

/// `POST /api/suggestions`
pub async fn create_suggestion(state: AppState, body: Bytes) -> Result<Response, ApiError> {
    let draft = decode_body::<NewSuggestion>(&body)?.normalize()?;

    let id = run_blocking(state.store(), move |store| store.insert(&draft))
        .await
        .map_err(|e| ApiError::internal(&e, "insert error"))?;

    let created = fetch(state.store(), id).await?;
    info!(id, "suggestion created");
    Ok(respond_json(&created))
}

/// `PUT|PATCH /api/suggestions/{id}`
pub async fn update_suggestion(
    state: AppState,
    id: i64,
    body: Bytes,
) -> Result<Response, ApiError> {
    let changes = decode_body::<SuggestionPatch>(&body)?.normalize()?;

    let matched = run_blocking(state.store(), move |store| store.update(id, &changes))
        .await
        .map_err(|e| ApiError::internal(&e, "update error"))?;
    if !matched {
        debug!(id, "update matched no suggestion");
        return Err(ApiError::NotFound("suggestion not found"));
    }

    let updated = fetch(state.store(), id).await?;
    info!(id, "suggestion updated");
    Ok(respond_json(&updated))
}

/// `DELETE /api/suggestions/{id}`
///
/// Deleting an id that does not exist still succeeds.
pub async fn delete_suggestion(state: AppState, id: i64) -> Result<Response, ApiError> {
    let removed = run_blocking(state.store(), move |store| store.delete(id))
        .await
        .map_err(|e| ApiError::internal(&e, "delete error"))?;

    info!(id, removed, "suggestion deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Re-reads a row after a write. A row that vanished in between is a
/// server-side failure, not a 404.
async fn fetch(
    store: &Arc<dyn SuggestionStore>,
    id: i64,
) -> Result<crate::Suggestion, ApiError> {
    match run_blocking(store, move |store| store.get(id)).await {
        Ok(Some(suggestion)) => Ok(suggestion),
        Ok(None) => Err(ApiError::internal(
            &Error::NotFound(format!("suggestion {id} vanished after write")),
            "fetch error",
        )),
        Err(e) => Err(ApiError::internal(&e, "fetch error")),
    }
}

/// Decodes the first JSON value in `body`, which must be an object.
///
/// A JSON `null` decodes to `T::default()`. Arrays and scalars are
/// rejected even where the target struct could be filled positionally.
/// Bytes after the first value are ignored.
fn decode_body<T>(body: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    let first = serde_json::Deserializer::from_slice(body)
        .into_iter::<Option<Map<String, Value>>>()
        .next();

    let object = match first {
        Some(Ok(Some(object))) => object,
        Some(Ok(None)) => return Ok(T::default()),
        Some(Err(e)) => {
            debug!(error = %e, "malformed request body");
            return Err(ApiError::BadRequest("bad request"));
        },
        None => {
            debug!("empty request body");
            return Err(ApiError::BadRequest("bad request"));
        },
    };

    serde_json::from_value(Value::Object(object)).map_err(|e| {
        debug!(error = %e, "request body has wrong field types");
        ApiError::BadRequest("bad request")
    })
}

/// Runs a store call on the blocking thread pool.
async fn run_blocking<T, F>(store: &Arc<dyn SuggestionStore>, op: F) -> crate::Result<T>
where
    F: FnOnce(&dyn SuggestionStore) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || op(store.as_ref()))
        .await
        .unwrap_or_else(|e| {
            Err(Error::OperationFailed {
                operation: "spawn_blocking".to_string(),
                cause: e.to_string(),
            })
        })
}
