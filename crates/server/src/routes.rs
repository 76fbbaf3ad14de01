//! Route table for the tracker API. Listings return the records plus a
//! `fetch-time` header; mutations optionally echo that header back and are
//! rejected with 409 when it no longer matches.

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

pub(crate) fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route(
            "/shows",
            get(handlers::list_shows).post(handlers::submit_show),
        )
        .route("/shows/:id", delete(handlers::delete_show))
        .route(
            "/movies",
            get(handlers::list_movies).post(handlers::submit_movie),
        )
        .route("/movies/:id", delete(handlers::delete_movie))
        .route(
            "/webcomics",
            get(handlers::list_webcomics).post(handlers::submit_webcomic),
        )
        .route("/webcomics/:id", delete(handlers::delete_webcomic))
        .route("/undo", post(handlers::undo))
        .route("/redo", post(handlers::redo))
        .with_state(state)
}
