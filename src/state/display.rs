//! Display helpers derived from the countdown

use serde::{Deserialize, Serialize};

/// Urgency tier used to colour the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTier {
    Ample,
    Warning,
    Critical,
}

/// Format seconds as zero-padded `MM:SS`. Negative input is shown as `00:00`.
pub fn format_time(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Pick a colour tier from the remaining fraction of the session
pub fn color_tier(remaining_seconds: u64, total_seconds: u64) -> ColorTier {
    if total_seconds == 0 {
        return ColorTier::Critical;
    }

    let ratio = remaining_seconds as f64 / total_seconds as f64;
    if ratio > 0.66 {
        ColorTier::Ample
    } else if ratio > 0.33 {
        ColorTier::Warning
    } else {
        ColorTier::Critical
    }
}

/// Completed share of the session as a whole percentage
pub fn progress_percent(remaining_seconds: u64, total_seconds: u64) -> u8 {
    if total_seconds == 0 {
        return 0;
    }

    let remaining = remaining_seconds.min(total_seconds) as f64;
    let done = 1.0 - remaining / total_seconds as f64;
    (done * 100.0).round() as u8
}
