//! State management module
//!
//! This module contains the focus timer state machine, the session hand-off
//! types and the shared controller that drives them.

pub mod app_state;
pub mod display;
pub mod session;
pub mod status;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use display::{color_tier, format_time, ColorTier};
pub use session::{CompletedSession, SessionSnapshot, SessionSummary, StoredSession, SubmitStatus};
pub use status::{TimerEvent, TimerStatus};
pub use timer_state::{TimerPhase, TimerState};
