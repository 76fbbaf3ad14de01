use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use watchlog_engine::EngineError;
use watchlog_storage::StorageError;

pub(crate) fn bad_request(err: anyhow::Error) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": err.to_string()})),
    )
        .into_response()
}

pub(crate) fn not_found(msg: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": msg})),
    )
        .into_response()
}

pub(crate) fn conflict(msg: &str) -> Response {
    (
        StatusCode::CONFLICT,
        Json(serde_json::json!({"error": msg})),
    )
        .into_response()
}

pub(crate) fn internal_error(err: anyhow::Error) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": err.to_string()})),
    )
        .into_response()
}

/// Map engine failures onto wire responses: stale fetch times and id
/// collisions are conflicts, missing rows are 404s, bad header text is a
/// 400, anything else is a 500.
pub(crate) fn from_engine(err: EngineError) -> Response {
    match err {
        EngineError::Stale { .. } => conflict(&err.to_string()),
        EngineError::NotFound { .. } | EngineError::Storage(StorageError::NotFound { .. }) => {
            not_found(&err.to_string())
        }
        EngineError::Storage(StorageError::IdCollision { .. }) => conflict(&err.to_string()),
        EngineError::InvalidFetchTime(_) => bad_request(anyhow::anyhow!(err)),
        _ => internal_error(anyhow::anyhow!(err)),
    }
}
