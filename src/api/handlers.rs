//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{extract::State, response::Json};
use tracing::{debug, info};

use crate::state::AppState;
use super::responses::{
    ApiError, ApiResponse, DurationRequest, HealthResponse, SessionsResponse, SummaryRequest,
    SummaryResponse,
};

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ApiError> {
    let timer = state.status()?;
    Ok(Json(ApiResponse::ok(format!("{} remaining", timer.display), timer)))
}

/// Handle POST /timer/start-pause - Toggle the countdown
pub async fn start_pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ApiError> {
    let timer = state.start_pause()?;
    let message = if timer.running { "Focus timer started" } else { "Focus timer paused" };
    info!("Start/pause endpoint called - {}", message);
    Ok(Json(ApiResponse::ok(message.to_string(), timer)))
}

/// Handle POST /timer/reset - Re-arm the timer, ending any session in progress
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ApiError> {
    let timer = state.reset()?;
    let message = if timer.summary.is_some() {
        "Focus timer reset, session summary requested"
    } else {
        "Focus timer reset"
    };
    info!("Reset endpoint called - {}", message);
    Ok(Json(ApiResponse::ok(message.to_string(), timer)))
}

/// Handle POST /timer/duration - Change the configured minutes
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    let Some(minutes) = request.minutes() else {
        debug!("Duration endpoint called with non-numeric minutes: {}", request.minutes);
        let timer = state.status()?;
        return Ok(Json(ApiResponse::ignored("Duration unchanged".to_string(), timer)));
    };

    let (applied, timer) = state.set_duration(minutes)?;
    if applied {
        Ok(Json(ApiResponse::ok(
            format!("Duration set to {} minutes", timer.configured_minutes),
            timer,
        )))
    } else {
        Ok(Json(ApiResponse::ignored("Duration unchanged".to_string(), timer)))
    }
}

/// Handle POST /summary - Save the pending session with a score and notes
pub async fn submit_summary_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let stored = state.submit_summary(request.score, &request.notes).await?;
    info!("Summary endpoint called - session {} saved", stored.id);
    Ok(Json(SummaryResponse::saved(stored)))
}

/// Handle DELETE /summary - Discard the pending session summary
pub async fn dismiss_summary_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ApiError> {
    let timer = state.dismiss_summary()?;
    Ok(Json(ApiResponse::ok("Session summary dismissed".to_string(), timer)))
}

/// Handle GET /sessions - Sessions stored by the planner API
pub async fn sessions_handler(State(state): State<Arc<AppState>>) -> Result<Json<SessionsResponse>, ApiError> {
    let sessions = state.list_sessions().await?;
    Ok(Json(SessionsResponse::from(sessions)))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.get_uptime()))
}
