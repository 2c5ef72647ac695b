//! Planner API client that stores finished focus sessions

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::credentials::TokenProvider;
use crate::{
    error::PersistError,
    state::session::{CompletedSession, StoredSession},
};

/// Base URL used when none is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

const SESSIONS_PATH: &str = "/api/pomodoro";

/// Destination for completed sessions
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Persist one session and return the stored record
    async fn save_session(&self, session: &CompletedSession) -> Result<StoredSession, PersistError>;

    /// All sessions stored for the current user
    async fn list_sessions(&self) -> Result<Vec<StoredSession>, PersistError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// `SessionStore` backed by the planner REST API
#[derive(Clone)]
pub struct HttpSessionStore {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl HttpSessionStore {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn sessions_url(&self) -> String {
        format!("{}{}", self.base_url, SESSIONS_PATH)
    }

    async fn bearer(&self) -> Result<String, PersistError> {
        self.tokens.token().await.ok_or(PersistError::MissingCredential)
    }
}

#[async_trait]
impl SessionStore for HttpSessionStore {
    async fn save_session(&self, session: &CompletedSession) -> Result<StoredSession, PersistError> {
        let token = self.bearer().await?;
        let url = self.sessions_url();
        debug!("Posting focus session to {}", url);

        let response = self.client
            .post(&url)
            .bearer_auth(token)
            .json(session)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(rejection(status, response, "Failed to save session").await);
        }

        let stored = response.json::<StoredSession>().await
            .map_err(|e| PersistError::InvalidResponse(e.to_string()))?;
        info!("Focus session stored with id {}", stored.id);
        Ok(stored)
    }

    async fn list_sessions(&self) -> Result<Vec<StoredSession>, PersistError> {
        let token = self.bearer().await?;

        let response = self.client
            .get(self.sessions_url())
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(rejection(status, response, "Failed to load sessions").await);
        }

        response.json::<Vec<StoredSession>>().await
            .map_err(|e| PersistError::InvalidResponse(e.to_string()))
    }
}

/// Build the error for a non-2xx answer, preferring the server's `message`
async fn rejection(status: StatusCode, response: Response, fallback: &str) -> PersistError {
    let message = response.json::<ErrorBody>().await
        .ok()
        .and_then(|body| body.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("{} (Status: {})", fallback, status.as_u16()));

    warn!("Planner API rejected request with {}: {}", status, message);
    PersistError::Rejected {
        status: status.as_u16(),
        message,
    }
}
