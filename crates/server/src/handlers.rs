use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};

use watchlog_core::{Movie, Record, RecordKind, Show, Webcomic};
use watchlog_engine::{format_fetch_token, parse_fetch_token};

use crate::http_error;
use crate::state::AppState;

/// Header carrying the opaque fetch token both ways: set on every listing
/// response, optionally echoed back on mutations.
pub(crate) const FETCH_TIME_HEADER: &str = "fetch-time";

pub(crate) async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({"ok": true}))
}

// ========================================================================
// Listings
// ========================================================================

pub(crate) async fn list_shows(State(state): State<Arc<AppState>>) -> Result<Response, Response> {
    list(state, RecordKind::Show).await
}

pub(crate) async fn list_movies(State(state): State<Arc<AppState>>) -> Result<Response, Response> {
    list(state, RecordKind::Movie).await
}

pub(crate) async fn list_webcomics(State(state): State<Arc<AppState>>) -> Result<Response, Response> {
    list(state, RecordKind::Webcomic).await
}

async fn list(state: Arc<AppState>, kind: RecordKind) -> Result<Response, Response> {
    let mut engine = state.engine.lock().await;
    let (records, token) = engine.fetch(kind).map_err(http_error::from_engine)?;
    drop(engine);

    let value = HeaderValue::from_str(&format_fetch_token(token))
        .map_err(|e| http_error::internal_error(anyhow::anyhow!(e)))?;
    let mut response = Json(records).into_response();
    response.headers_mut().insert(FETCH_TIME_HEADER, value);
    Ok(response)
}

// ========================================================================
// Submissions (add or full-row update)
// ========================================================================

pub(crate) async fn submit_show(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(show): Json<Show>,
) -> Result<Json<Record>, Response> {
    submit(state, &headers, Record::Show(show)).await
}

pub(crate) async fn submit_movie(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(movie): Json<Movie>,
) -> Result<Json<Record>, Response> {
    submit(state, &headers, Record::Movie(movie)).await
}

pub(crate) async fn submit_webcomic(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(comic): Json<Webcomic>,
) -> Result<Json<Record>, Response> {
    submit(state, &headers, Record::Webcomic(comic)).await
}

async fn submit(
    state: Arc<AppState>,
    headers: &HeaderMap,
    record: Record,
) -> Result<Json<Record>, Response> {
    let token = fetch_token(headers)?;
    let mut engine = state.engine.lock().await;
    let stored = engine
        .submit(record, token)
        .map_err(http_error::from_engine)?;
    Ok(Json(stored))
}

// ========================================================================
// Deletions
// ========================================================================

pub(crate) async fn delete_show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, Response> {
    remove(state, &headers, RecordKind::Show, id).await
}

pub(crate) async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, Response> {
    remove(state, &headers, RecordKind::Movie, id).await
}

pub(crate) async fn delete_webcomic(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, Response> {
    remove(state, &headers, RecordKind::Webcomic, id).await
}

async fn remove(
    state: Arc<AppState>,
    headers: &HeaderMap,
    kind: RecordKind,
    id: i64,
) -> Result<Json<serde_json::Value>, Response> {
    let token = fetch_token(headers)?;
    let mut engine = state.engine.lock().await;
    engine
        .remove(kind, id, token)
        .map_err(http_error::from_engine)?;
    Ok(Json(serde_json::json!({"ok": true})))
}

// ========================================================================
// History
// ========================================================================

pub(crate) async fn undo(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, Response> {
    let token = fetch_token(&headers)?;
    let mut engine = state.engine.lock().await;
    engine.undo(token).map_err(http_error::from_engine)?;
    Ok(Json(serde_json::json!({"ok": true})))
}

pub(crate) async fn redo(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, Response> {
    let token = fetch_token(&headers)?;
    let mut engine = state.engine.lock().await;
    engine.redo(token).map_err(http_error::from_engine)?;
    Ok(Json(serde_json::json!({"ok": true})))
}

/// Pull the optional fetch token out of the request headers. A missing
/// header skips the staleness check entirely; a malformed one is a 400.
fn fetch_token(headers: &HeaderMap) -> Result<Option<DateTime<Utc>>, Response> {
    let Some(value) = headers.get(FETCH_TIME_HEADER) else {
        return Ok(None);
    };
    let text = value
        .to_str()
        .map_err(|e| http_error::bad_request(anyhow::anyhow!("fetch-time header: {e}")))?;
    let token = parse_fetch_token(text).map_err(http_error::from_engine)?;
    Ok(Some(token))
}
