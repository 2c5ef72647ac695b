//! Finished sessions and the summary hand-off to the planner API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FocusError;

/// Score preselected when the summary prompt opens
pub const DEFAULT_SCORE: u8 = 3;

/// Why a session stopped counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The countdown reached zero
    Expired,
    /// Reset was pressed while running or part-way through
    EndedEarly,
}

/// Timer fields captured at the moment a session ended, before reset rewrites them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub started_at: Option<DateTime<Utc>>,
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    pub reason: EndReason,
}

impl SessionSnapshot {
    pub fn elapsed_seconds(&self) -> u64 {
        self.total_seconds.saturating_sub(self.remaining_seconds)
    }

    /// Elapsed time rounded to the nearest minute, halves rounding up
    pub fn elapsed_minutes(&self) -> u64 {
        (self.elapsed_seconds() + 30) / 60
    }
}

/// Score and notes supplied by the user after a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub score: u8,
    pub notes: String,
}

impl SessionSummary {
    pub fn new(score: i64, notes: &str) -> Result<Self, FocusError> {
        if !(1..=5).contains(&score) {
            return Err(FocusError::InvalidScore(score));
        }

        Ok(Self {
            score: score as u8,
            notes: notes.trim().to_string(),
        })
    }
}

/// Payload posted to `/api/pomodoro`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedSession {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: DateTime<Utc>,
    /// Elapsed minutes
    pub duration: u64,
    pub score: u8,
    pub notes: String,
}

impl CompletedSession {
    pub fn assemble(snapshot: &SessionSnapshot, summary: &SessionSummary, end_time: DateTime<Utc>) -> Self {
        Self {
            start_time: snapshot.started_at,
            end_time,
            duration: snapshot.elapsed_minutes(),
            score: summary.score,
            notes: summary.notes.clone(),
        }
    }
}

/// Session record as returned by the planner API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub id: i64,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration: i64,
    pub score: Option<i16>,
    pub notes: Option<String>,
}

/// Progress of the most recent summary submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitStatus {
    Idle,
    Submitting,
    Success,
    Error,
}

/// What a UI needs to render the summary form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPrompt {
    pub reason: EndReason,
    pub started_at: Option<DateTime<Utc>>,
    pub elapsed_minutes: u64,
    pub default_score: u8,
}

impl From<&SessionSnapshot> for SummaryPrompt {
    fn from(snapshot: &SessionSnapshot) -> Self {
        Self {
            reason: snapshot.reason,
            started_at: snapshot.started_at,
            elapsed_minutes: snapshot.elapsed_minutes(),
            default_score: DEFAULT_SCORE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn snapshot(total: u64, remaining: u64) -> SessionSnapshot {
        SessionSnapshot {
            started_at: Some(Utc.with_ymd_and_hms(2025, 12, 1, 9, 0, 0).unwrap()),
            total_seconds: total,
            remaining_seconds: remaining,
            reason: EndReason::EndedEarly,
        }
    }

    #[test]
    fn test_elapsed_minutes_rounds_to_nearest() {
        assert_eq!(snapshot(300, 0).elapsed_minutes(), 5);
        assert_eq!(snapshot(300, 300).elapsed_minutes(), 0);
        assert_eq!(snapshot(300, 271).elapsed_minutes(), 0);
        assert_eq!(snapshot(300, 270).elapsed_minutes(), 1);
        assert_eq!(snapshot(1500, 1500 - 149).elapsed_minutes(), 2);
    }

    #[test]
    fn test_summary_validates_score() {
        assert!(SessionSummary::new(1, "").is_ok());
        assert!(SessionSummary::new(5, "").is_ok());
        assert!(matches!(SessionSummary::new(0, ""), Err(FocusError::InvalidScore(0))));
        assert!(matches!(SessionSummary::new(6, ""), Err(FocusError::InvalidScore(6))));
    }

    #[test]
    fn test_summary_trims_notes() {
        let summary = SessionSummary::new(4, "  focused well \n").unwrap();
        assert_eq!(summary.notes, "focused well");
    }

    #[test]
    fn test_assemble_completed_session() {
        let end = Utc.with_ymd_and_hms(2025, 12, 1, 9, 5, 0).unwrap();
        let summary = SessionSummary::new(4, "focused well").unwrap();
        let session = CompletedSession::assemble(&snapshot(300, 0), &summary, end);

        assert_eq!(session.duration, 5);
        assert_eq!(session.score, 4);
        assert_eq!(session.notes, "focused well");
        assert_eq!(session.end_time, end);
    }

    #[test]
    fn test_completed_session_wire_format() {
        let end = Utc.with_ymd_and_hms(2025, 12, 1, 9, 25, 0).unwrap();
        let mut snap = snapshot(1500, 0);
        snap.started_at = None;
        let summary = SessionSummary::new(3, "").unwrap();
        let value = serde_json::to_value(CompletedSession::assemble(&snap, &summary, end)).unwrap();

        assert_eq!(value["startTime"], serde_json::Value::Null);
        assert_eq!(value["endTime"], "2025-12-01T09:25:00Z");
        assert_eq!(value["duration"], 25);
        assert_eq!(value["score"], 3);
        assert_eq!(value["notes"], "");
    }

    #[test]
    fn test_stored_session_accepts_sparse_record() {
        let stored: StoredSession = serde_json::from_str(
            r#"{"id":7,"startTime":"2025-12-01T09:00:00Z","endTime":null,"duration":25,"score":null,"notes":null}"#,
        )
        .unwrap();
        assert_eq!(stored.id, 7);
        assert_eq!(stored.duration, 25);
        assert!(stored.end_time.is_none());
    }

    #[test]
    fn test_summary_prompt_from_snapshot() {
        let prompt = SummaryPrompt::from(&snapshot(600, 300));
        assert_eq!(prompt.elapsed_minutes, 5);
        assert_eq!(prompt.default_score, DEFAULT_SCORE);
        assert_eq!(prompt.reason, EndReason::EndedEarly);
    }
}
