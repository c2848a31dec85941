pub mod config;
pub mod db;
pub mod dtos;
pub mod error;
pub mod models;
pub mod services;

use std::time::Duration;

use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    http::StatusCode,
    routing::{delete, get},
};
use sqlx::SqlitePool;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::services::{line, station};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}

/// Builds the HTTP surface: station and line routes plus trace and timeout middleware.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    let routes = Router::new()
        .route(
            "/stations",
            get(station::get_stations).post(station::create_station),
        )
        .route("/stations/{id}", delete(station::delete_station))
        .route("/lines", get(line::get_lines).post(line::create_line))
        .route(
            "/lines/{id}",
            get(line::get_line)
                .put(line::update_line)
                .delete(line::delete_line),
        )
        .with_state(state);

    with_middleware(routes, request_timeout)
}

/// Wraps `router` in request tracing and a timeout that answers 408 once `request_timeout` elapses.
pub fn with_middleware<S>(router: Router<S>, request_timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(|error: BoxError| async move {
                if error.is::<tower::timeout::error::Elapsed>() {
                    Ok(StatusCode::REQUEST_TIMEOUT)
                } else {
                    Err((
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Unhandled internal error: {error}"),
                    ))
                }
            }))
            .timeout(request_timeout)
            .layer(TraceLayer::new_for_http())
            .into_inner(),
    )
}
