#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Notify;
use focus_timer::{
    error::PersistError,
    services::SessionStore,
    state::{AppState, CompletedSession, StoredSession},
    utils::ManualClock,
};

/// In-memory store that records what it was asked to save
#[derive(Default)]
pub struct RecordingStore {
    pub saved: Mutex<Vec<CompletedSession>>,
    failures_left: AtomicUsize,
    missing_token: bool,
    /// Saves wait here until `release` when set
    gate: Option<Notify>,
    panics: bool,
}

impl RecordingStore {
    /// Reject the next `n` saves with a server error
    pub fn failing(n: usize) -> Self {
        Self {
            failures_left: AtomicUsize::new(n),
            ..Self::default()
        }
    }

    pub fn without_token() -> Self {
        Self {
            missing_token: true,
            ..Self::default()
        }
    }

    /// Hold every save until `release` is called
    pub fn gated() -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::default()
        }
    }

    /// Let one held save through
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// Panic inside every save
    pub fn panicking() -> Self {
        Self {
            panics: true,
            ..Self::default()
        }
    }

    pub fn saved(&self) -> Vec<CompletedSession> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionStore for RecordingStore {
    async fn save_session(&self, session: &CompletedSession) -> Result<StoredSession, PersistError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.panics {
            panic!("store crashed");
        }
        if self.missing_token {
            return Err(PersistError::MissingCredential);
        }

        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(PersistError::Rejected {
                status: 500,
                message: "Database unavailable".to_string(),
            });
        }

        let mut saved = self.saved.lock().unwrap();
        saved.push(session.clone());
        Ok(StoredSession {
            id: saved.len() as i64,
            start_time: session.start_time,
            end_time: Some(session.end_time),
            duration: session.duration as i64,
            score: Some(session.score as i16),
            notes: Some(session.notes.clone()),
        })
    }

    async fn list_sessions(&self) -> Result<Vec<StoredSession>, PersistError> {
        let saved = self.saved.lock().unwrap();
        Ok(saved
            .iter()
            .enumerate()
            .map(|(i, s)| StoredSession {
                id: i as i64 + 1,
                start_time: s.start_time,
                end_time: Some(s.end_time),
                duration: s.duration as i64,
                score: Some(s.score as i16),
                notes: Some(s.notes.clone()),
            })
            .collect())
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 1, 9, 0, 0).unwrap()
}

/// Timer armed with `minutes`, wired to `store` and a pinned clock
pub fn app_state(minutes: u64, store: Arc<RecordingStore>) -> (Arc<AppState>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(fixed_now()));
    let state = AppState::new(0, "127.0.0.1".to_string(), minutes, store)
        .with_clock(clock.clone());
    (Arc::new(state), clock)
}
