//! Route table and request dispatch.

use super::handlers::{
    create_suggestion, delete_suggestion, list_suggestions, update_suggestion,
};
use super::{ApiError, AppState};
use crate::storage::SuggestionStore;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::any;
use std::path::Path as FsPath;
use std::sync::Arc;
use std::time::Instant;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Collection endpoint.
pub const COLLECTION_PATH: &str = "/api/suggestions";

/// Builds the application router.
///
/// - `/api/suggestions`: `GET` lists, `POST` creates
/// - `/api/suggestions/{id}`: `PUT`/`PATCH` updates, `DELETE` deletes
/// - anything else is served from `static_dir`
pub fn router(store: Arc<dyn SuggestionStore>, static_dir: impl AsRef<FsPath>) -> Router {
    Router::new()
        .route(COLLECTION_PATH, any(suggestions_collection))
        .route("/api/suggestions/", any(missing_id))
        .route("/api/suggestions/{*id}", any(suggestion_item))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(middleware::from_fn(record_request_metrics))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(store))
}

/// Collection endpoint. `GET` lists and `POST` creates; every other
/// method, `HEAD` included, is a 405.
async fn suggestions_collection(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Response, ApiError> {
    if method == Method::GET {
        list_suggestions(state).await
    } else if method == Method::POST {
        create_suggestion(state, body).await
    } else {
        Err(ApiError::MethodNotAllowed)
    }
}

/// Item endpoint. The id is validated before the method is looked at, so a
/// bad id is a 400 for every method and never reaches the store.
async fn suggestion_item(
    State(state): State<AppState>,
    method: Method,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let id = parse_id(&raw_id)?;

    if method == Method::PUT || method == Method::PATCH {
        update_suggestion(state, id, body).await
    } else if method == Method::DELETE {
        delete_suggestion(state, id).await
    } else {
        Err(ApiError::MethodNotAllowed)
    }
}

async fn missing_id() -> ApiError {
    ApiError::BadRequest("invalid id")
}

/// Parses an item id. Only positive integers are accepted.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(ApiError::BadRequest("invalid id"))
}

async fn record_request_metrics(request: Request, next: Next) -> Response {
    let route = route_label(request.uri().path());
    let method = request.method().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    metrics::counter!(
        "http_requests_total",
        "route" => route,
        "method" => method.clone(),
        "status" => status.clone()
    )
    .increment(1);
    metrics::histogram!(
        "http_request_duration_ms",
        "route" => route,
        "method" => method,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64() * 1000.0);

    response
}

fn route_label(path: &str) -> &'static str {
    if path == COLLECTION_PATH {
        "collection"
    } else if path.starts_with("/api/suggestions/") {
        "item"
    } else {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("1" => Ok(1); "one")]
    #[test_case("42" => Ok(42); "plain")]
    #[test_case("+7" => Ok(7); "explicit plus")]
    #[test_case("9223372036854775807" => Ok(i64::MAX); "max")]
    #[test_case("0" => Err(ApiError::BadRequest("invalid id")); "zero")]
    #[test_case("-1" => Err(ApiError::BadRequest("invalid id")); "negative")]
    #[test_case("abc" => Err(ApiError::BadRequest("invalid id")); "letters")]
    #[test_case("" => Err(ApiError::BadRequest("invalid id")); "empty")]
    #[test_case("1.5" => Err(ApiError::BadRequest("invalid id")); "fraction")]
    #[test_case("3/extra" => Err(ApiError::BadRequest("invalid id")); "nested path")]
    #[test_case("9223372036854775808" => Err(ApiError::BadRequest("invalid id")); "overflow")]
    fn test_parse_id(raw: &str) -> Result<i64, ApiError> {
        parse_id(raw)
    }

    #[test]
    fn test_route_label() {
        assert_eq!(route_label("/api/suggestions"), "collection");
        assert_eq!(route_label("/api/suggestions/4"), "item");
        assert_eq!(route_label("/api/suggestions/"), "item");
        assert_eq!(route_label("/index.html"), "static");
    }
}
