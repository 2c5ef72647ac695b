//! Published view of the focus timer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    display::ColorTier,
    session::{SessionSnapshot, StoredSession, SubmitStatus, SummaryPrompt},
    timer_state::{TimerPhase, TimerState},
};

/// Everything a render layer needs to draw the timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerStatus {
    pub phase: TimerPhase,
    pub running: bool,
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    pub configured_minutes: u64,
    /// Remaining time as `MM:SS`
    pub display: String,
    pub color_tier: ColorTier,
    pub progress_percent: u8,
    pub session_start: Option<DateTime<Utc>>,
    pub alert_active: bool,
    pub summary: Option<SummaryPrompt>,
    pub submit_status: SubmitStatus,
    pub error_message: Option<String>,
}

impl TimerStatus {
    pub fn from_timer(timer: &TimerState) -> Self {
        Self {
            phase: timer.phase(),
            running: timer.is_running(),
            remaining_seconds: timer.remaining_seconds(),
            total_seconds: timer.total_seconds(),
            configured_minutes: timer.configured_minutes(),
            display: timer.display(),
            color_tier: timer.color_tier(),
            progress_percent: timer.progress_percent(),
            session_start: timer.session_start(),
            alert_active: false,
            summary: None,
            submit_status: SubmitStatus::Idle,
            error_message: None,
        }
    }
}

/// Notifications for subscribers of the timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum TimerEvent {
    /// A session stopped counting and a summary is wanted
    SessionEnded(SessionSnapshot),
    /// The planner API accepted a session
    SessionSaved(StoredSession),
}
