//! Delayed clearing of transient notices

use std::{sync::Weak, time::Duration};
use tokio::time::sleep;
use tracing::warn;

use crate::state::AppState;

/// Short-lived flags shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// "Session saved" after a successful submission
    SubmitSuccess,
    /// The countdown reached zero
    ExpiryAlert,
}

impl Notice {
    /// How long the notice stays visible
    pub fn lifetime(self) -> Duration {
        match self {
            Notice::SubmitSuccess => Duration::from_secs(3),
            Notice::ExpiryAlert => Duration::from_secs(5),
        }
    }
}

/// Clear `notice` after its lifetime unless a newer one replaced it
pub fn schedule_notice_clear(state: Weak<AppState>, notice: Notice, generation: u64) {
    tokio::spawn(async move {
        sleep(notice.lifetime()).await;

        if let Some(state) = state.upgrade() {
            if let Err(e) = state.clear_notice(notice, generation) {
                warn!("Failed to clear {:?} notice: {}", notice, e);
            }
        }
    });
}
