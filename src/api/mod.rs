//! HTTP API module
//!
//! This module contains the local control endpoints a UI uses to drive the timer.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .route("/timer/start-pause", post(start_pause_handler))
        .route("/timer/reset", post(reset_handler))
        .route("/timer/duration", post(duration_handler))
        .route("/summary", post(submit_summary_handler).delete(dismiss_summary_handler))
        .route("/sessions", get(sessions_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
