//! Background tasks module
//!
//! This module contains the countdown tick task and notice expiry timers.

pub mod notice_timer;
pub mod tick_timer;

// Re-export main functions
pub use notice_timer::{schedule_notice_clear, Notice};
pub use tick_timer::{spawn_tick_task, TickHandle};
