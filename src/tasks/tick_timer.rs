//! Countdown tick background task

use std::{sync::Weak, time::Duration};
use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::state::AppState;

/// Owner's handle on a running tick task. Dropping it stops the task.
#[derive(Debug)]
pub struct TickHandle {
    token: CancellationToken,
}

impl TickHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Spawn a task that delivers one tick per `period` to the timer run `generation`.
///
/// The task ends when the handle is cancelled, the state is dropped or the
/// timer reports it is no longer running.
pub fn spawn_tick_task(state: Weak<AppState>, period: Duration, generation: u64) -> TickHandle {
    let token = CancellationToken::new();
    let cancelled = token.clone();

    tokio::spawn(async move {
        tick_loop(state, period, generation, cancelled).await;
    });

    TickHandle { token }
}

async fn tick_loop(state: Weak<AppState>, period: Duration, generation: u64, cancelled: CancellationToken) {
    debug!("Tick task for run {} started", generation);

    // First tick lands one full period after start
    let mut interval = interval_at(Instant::now() + period, period);

    loop {
        tokio::select! {
            _ = cancelled.cancelled() => {
                debug!("Tick task for run {} cancelled", generation);
                break;
            }

            _ = interval.tick() => {
                let Some(state) = state.upgrade() else {
                    debug!("Timer state dropped, stopping tick task");
                    break;
                };

                match state.tick(generation) {
                    Ok(true) => {}
                    Ok(false) => {
                        debug!("Run {} stopped counting", generation);
                        break;
                    }
                    Err(e) => {
                        error!("Failed to deliver tick: {}", e);
                        break;
                    }
                }
            }
        }
    }
}
