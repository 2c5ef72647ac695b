//! Countdown state machine for a single focus timer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::display::{color_tier, format_time, progress_percent, ColorTier};
use super::session::{EndReason, SessionSnapshot};

/// Duration used when none is configured
pub const DEFAULT_MINUTES: u64 = 5;

/// Phase derived from the countdown fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    /// Reached zero and waiting for the session summary
    Expired,
}

/// Result of delivering one tick to the timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer was not running, nothing changed
    Ignored,
    /// Still running with this many seconds left
    Counting(u64),
    /// This tick took the countdown to zero
    Expired(SessionSnapshot),
}

/// Timer state for a focus countdown
///
/// `remaining_seconds` only moves while `running` is set and `total_seconds`
/// only changes while it is not.
#[derive(Debug, Clone)]
pub struct TimerState {
    configured_minutes: u64,
    total_seconds: u64,
    remaining_seconds: u64,
    running: bool,
    session_start: Option<DateTime<Utc>>,
}

impl TimerState {
    /// Create an idle timer armed with `minutes` (at least one)
    pub fn new(minutes: u64) -> Self {
        let minutes = minutes.max(1);
        let seconds = minutes.saturating_mul(60);
        Self {
            configured_minutes: minutes,
            total_seconds: seconds,
            remaining_seconds: seconds,
            running: false,
            session_start: None,
        }
    }

    pub fn phase(&self) -> TimerPhase {
        if self.running {
            TimerPhase::Running
        } else if self.remaining_seconds == 0 {
            TimerPhase::Expired
        } else {
            TimerPhase::Idle
        }
    }

    /// Toggle between idle and running and return the new phase.
    ///
    /// An expired timer has nothing left to count and stays expired.
    pub fn start_pause(&mut self, now: DateTime<Utc>) -> TimerPhase {
        match self.phase() {
            TimerPhase::Running => self.running = false,
            TimerPhase::Idle => {
                self.session_start = Some(now);
                self.running = true;
            }
            TimerPhase::Expired => {}
        }
        self.phase()
    }

    /// Advance the countdown by one second
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Ignored;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return TickOutcome::Counting(self.remaining_seconds);
        }

        self.running = false;
        TickOutcome::Expired(self.snapshot(EndReason::Expired))
    }

    /// Re-arm at the configured duration.
    ///
    /// Returns the ended session when the timer was running or part-way
    /// through; the snapshot is taken before any field is rewritten.
    pub fn reset(&mut self) -> Option<SessionSnapshot> {
        let ended = match self.phase() {
            TimerPhase::Running => Some(self.snapshot(EndReason::EndedEarly)),
            TimerPhase::Idle if self.remaining_seconds < self.total_seconds => {
                Some(self.snapshot(EndReason::EndedEarly))
            }
            _ => None,
        };

        self.rearm();
        ended
    }

    /// Set a new duration while not running.
    ///
    /// Non-finite or non-positive minutes are ignored. Returns whether the
    /// duration was applied.
    pub fn set_duration(&mut self, minutes: f64) -> bool {
        if !minutes.is_finite() || minutes <= 0.0 || self.running {
            return false;
        }

        self.configured_minutes = (minutes.floor() as u64).max(1);
        self.total_seconds = self.configured_minutes.saturating_mul(60);
        self.remaining_seconds = self.total_seconds;
        true
    }

    /// Back to idle at the configured duration with no session in progress
    pub fn rearm(&mut self) {
        self.total_seconds = self.configured_minutes.saturating_mul(60);
        self.remaining_seconds = self.total_seconds;
        self.running = false;
        self.session_start = None;
    }

    fn snapshot(&self, reason: EndReason) -> SessionSnapshot {
        SessionSnapshot {
            started_at: self.session_start,
            total_seconds: self.total_seconds,
            remaining_seconds: self.remaining_seconds,
            reason,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn configured_minutes(&self) -> u64 {
        self.configured_minutes
    }

    pub fn session_start(&self) -> Option<DateTime<Utc>> {
        self.session_start
    }

    /// Remaining time as `MM:SS`
    pub fn display(&self) -> String {
        format_time(i64::try_from(self.remaining_seconds).unwrap_or(i64::MAX))
    }

    pub fn color_tier(&self) -> ColorTier {
        color_tier(self.remaining_seconds, self.total_seconds)
    }

    pub fn progress_percent(&self) -> u8 {
        progress_percent(self.remaining_seconds, self.total_seconds)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(DEFAULT_MINUTES)
    }
}
