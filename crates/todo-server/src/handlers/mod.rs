//! HTTP handlers

pub mod cors;
pub mod todo;

use crate::AppState;
use axum::{middleware, routing::any, Router};
use tower_http::trace::TraceLayer;

/// Path of the single todo resource.
pub const TODO_PATH: &str = "/todo";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(TODO_PATH, any(todo::dispatch))
        .layer(middleware::from_fn(cors::with_cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
