//! API request and response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{FocusError, PersistError},
    state::{StoredSession, TimerStatus},
};

/// API response structure for timer endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerStatus,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerStatus) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// The request changed the timer
    pub fn ok(message: String, timer: TimerStatus) -> Self {
        Self::new("ok".to_string(), message, timer)
    }

    /// The request was accepted but had no effect
    pub fn ignored(message: String, timer: TimerStatus) -> Self {
        Self::new("ignored".to_string(), message, timer)
    }
}

/// Body of `POST /timer/duration`. Anything that is not a number is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DurationRequest {
    #[serde(default)]
    pub minutes: Value,
}

impl DurationRequest {
    pub fn minutes(&self) -> Option<f64> {
        match &self.minutes {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Body of `POST /summary`
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryRequest {
    pub score: i64,
    #[serde(default)]
    pub notes: String,
}

/// Response of a saved summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub status: String,
    pub session: StoredSession,
    pub timestamp: DateTime<Utc>,
}

impl SummaryResponse {
    pub fn saved(session: StoredSession) -> Self {
        Self {
            status: "saved".to_string(),
            session,
            timestamp: Utc::now(),
        }
    }
}

/// Stored session history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub count: usize,
    pub sessions: Vec<StoredSession>,
}

impl From<Vec<StoredSession>> for SessionsResponse {
    fn from(sessions: Vec<StoredSession>) -> Self {
        Self {
            count: sessions.len(),
            sessions,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok(uptime: String) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime,
        }
    }
}

/// JSON error body, `{ "message": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Error returned by handlers
#[derive(Debug)]
pub struct ApiError(pub FocusError);

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            FocusError::NoPendingSummary | FocusError::SubmissionInProgress => StatusCode::CONFLICT,
            FocusError::InvalidScore(_) => StatusCode::UNPROCESSABLE_ENTITY,
            FocusError::Persist(PersistError::MissingCredential) => StatusCode::UNAUTHORIZED,
            FocusError::Persist(_) => StatusCode::BAD_GATEWAY,
            FocusError::StatePoisoned(_) | FocusError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FocusError> for ApiError {
    fn from(e: FocusError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            message: self.0.to_string(),
            timestamp: Utc::now(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
