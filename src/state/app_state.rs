//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

use super::{
    session::{CompletedSession, SessionSnapshot, SessionSummary, StoredSession, SubmitStatus, SummaryPrompt},
    status::{TimerEvent, TimerStatus},
    timer_state::{TickOutcome, TimerPhase, TimerState},
};
use crate::{
    error::{FocusError, PersistError, Result},
    services::SessionStore,
    tasks::{schedule_notice_clear, spawn_tick_task, Notice, TickHandle},
    utils::clock::{Clock, SystemClock},
};

/// Default spacing between countdown ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Everything behind the controller lock
#[derive(Debug)]
struct Controller {
    timer: TimerState,
    /// Ended session waiting for its summary
    pending: Option<SessionSnapshot>,
    submit_status: SubmitStatus,
    error_message: Option<String>,
    alert_active: bool,
    ticker: Option<TickHandle>,
    run_generation: u64,
    alert_generation: u64,
    success_generation: u64,
}

impl Controller {
    fn new(timer: TimerState) -> Self {
        Self {
            timer,
            pending: None,
            submit_status: SubmitStatus::Idle,
            error_message: None,
            alert_active: false,
            ticker: None,
            run_generation: 0,
            alert_generation: 0,
            success_generation: 0,
        }
    }

    fn status(&self) -> TimerStatus {
        TimerStatus {
            alert_active: self.alert_active,
            summary: self.pending.as_ref().map(SummaryPrompt::from),
            submit_status: self.submit_status,
            error_message: self.error_message.clone(),
            ..TimerStatus::from_timer(&self.timer)
        }
    }

    fn stop_ticking(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}

/// Focus timer controller shared by the HTTP layer and background tasks
pub struct AppState {
    controller: Mutex<Controller>,
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    tick_period: Duration,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Session lifecycle notifications
    pub event_tx: broadcast::Sender<TimerEvent>,
    /// Latest timer view
    pub status_tx: watch::Sender<TimerStatus>,
    /// Keep the receiver alive to prevent channel closure
    pub _status_rx: watch::Receiver<TimerStatus>,
}

impl AppState {
    /// Create an idle timer armed with `minutes`
    pub fn new(port: u16, host: String, minutes: u64, store: Arc<dyn SessionStore>) -> Self {
        let timer = TimerState::new(minutes);
        let (event_tx, _) = broadcast::channel(100);
        let (status_tx, status_rx) = watch::channel(TimerStatus::from_timer(&timer));

        Self {
            controller: Mutex::new(Controller::new(timer)),
            store,
            clock: Arc::new(SystemClock),
            tick_period: TICK_PERIOD,
            start_time: Instant::now(),
            port,
            host,
            event_tx,
            status_tx,
            _status_rx: status_rx,
        }
    }

    /// Use a different wall clock for session timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use a different spacing between ticks
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    fn controller(&self) -> Result<MutexGuard<'_, Controller>> {
        self.controller.lock()
            .map_err(|e| FocusError::StatePoisoned(e.to_string()))
    }

    /// Push the controller's view to status watchers
    fn publish(&self, controller: &Controller) -> TimerStatus {
        let status = controller.status();
        if let Err(e) = self.status_tx.send(status.clone()) {
            warn!("Failed to send timer status update: {}", e);
        }
        status
    }

    fn notify(&self, event: TimerEvent) {
        // No subscribers is fine
        if self.event_tx.send(event).is_err() {
            debug!("No timer event subscribers");
        }
    }

    /// Subscribe to session lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }

    /// Get current timer status
    pub fn status(&self) -> Result<TimerStatus> {
        Ok(self.controller()?.status())
    }

    /// Start or pause the countdown
    pub fn start_pause(self: &Arc<Self>) -> Result<TimerStatus> {
        let mut ctl = self.controller()?;
        let now = self.clock.now();

        match ctl.timer.start_pause(now) {
            TimerPhase::Running => {
                ctl.run_generation += 1;
                let generation = ctl.run_generation;
                ctl.ticker = Some(spawn_tick_task(Arc::downgrade(self), self.tick_period, generation));
                info!("Focus timer started with {} remaining", ctl.timer.display());
            }
            TimerPhase::Idle => {
                ctl.stop_ticking();
                info!("Focus timer paused with {} remaining", ctl.timer.display());
            }
            TimerPhase::Expired => {
                debug!("Start ignored, timer already expired");
            }
        }

        Ok(self.publish(&ctl))
    }

    /// Reset to the configured duration, ending the current session if it had begun
    pub fn reset(&self) -> Result<TimerStatus> {
        let mut ctl = self.controller()?;
        ctl.stop_ticking();
        ctl.alert_active = false;

        if let Some(snapshot) = ctl.timer.reset() {
            info!(
                "Focus session ended early after {} of {} seconds",
                snapshot.elapsed_seconds(),
                snapshot.total_seconds
            );
            self.raise_summary(&mut ctl, snapshot);
        } else {
            debug!("Focus timer reset without an active session");
        }

        Ok(self.publish(&ctl))
    }

    /// Change the duration. Invalid input and changes while running are ignored.
    pub fn set_duration(&self, minutes: f64) -> Result<(bool, TimerStatus)> {
        let mut ctl = self.controller()?;
        let applied = ctl.timer.set_duration(minutes);

        if applied {
            info!("Focus duration set to {} minutes", ctl.timer.configured_minutes());
        } else {
            debug!("Ignoring duration change to {} (running: {})", minutes, ctl.timer.is_running());
        }

        Ok((applied, self.publish(&ctl)))
    }

    /// Deliver one tick from the run `generation`. Returns whether that run keeps counting.
    pub fn tick(self: &Arc<Self>, generation: u64) -> Result<bool> {
        let mut ctl = self.controller()?;
        if generation != ctl.run_generation {
            debug!("Dropping stale tick from run {}", generation);
            return Ok(false);
        }

        match ctl.timer.tick() {
            TickOutcome::Ignored => Ok(false),
            TickOutcome::Counting(remaining) => {
                if remaining % 60 == 0 {
                    debug!("Focus timer at {}", ctl.timer.display());
                }
                self.publish(&ctl);
                Ok(true)
            }
            TickOutcome::Expired(snapshot) => {
                info!("Focus session complete after {} minutes", snapshot.elapsed_minutes());
                ctl.ticker = None;
                ctl.alert_active = true;
                ctl.alert_generation += 1;
                schedule_notice_clear(Arc::downgrade(self), Notice::ExpiryAlert, ctl.alert_generation);

                self.raise_summary(&mut ctl, snapshot);
                self.publish(&ctl);
                Ok(false)
            }
        }
    }

    /// Make `snapshot` the session waiting for a summary
    fn raise_summary(&self, ctl: &mut Controller, snapshot: SessionSnapshot) {
        if ctl.pending.is_some() {
            warn!("Replacing an unsaved session summary");
        }

        ctl.pending = Some(snapshot.clone());
        if ctl.submit_status != SubmitStatus::Submitting {
            ctl.submit_status = SubmitStatus::Idle;
            ctl.error_message = None;
        }
        self.notify(TimerEvent::SessionEnded(snapshot));
    }

    /// Save the pending session with the user's score and notes.
    ///
    /// On failure the summary stays pending so the user can retry. The call to
    /// the planner API runs on its own task and completes even if the caller
    /// goes away.
    pub async fn submit_summary(self: &Arc<Self>, score: i64, notes: &str) -> Result<StoredSession> {
        let summary = SessionSummary::new(score, notes)?;

        let (snapshot, record) = {
            let mut ctl = self.controller()?;
            let snapshot = ctl.pending.clone().ok_or(FocusError::NoPendingSummary)?;
            if ctl.submit_status == SubmitStatus::Submitting {
                return Err(FocusError::SubmissionInProgress);
            }

            ctl.submit_status = SubmitStatus::Submitting;
            ctl.error_message = None;
            self.publish(&ctl);
            let record = CompletedSession::assemble(&snapshot, &summary, self.clock.now());
            (snapshot, record)
        };

        info!(
            "Saving focus session: {} minutes, score {}",
            record.duration, record.score
        );

        let state = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let result = state.store.save_session(&record).await;
            state.finish_submission(&snapshot, result)
        });

        match handle.await {
            Ok(result) => result,
            Err(e) => {
                error!("Session save task failed: {}", e);
                let mut ctl = self.controller()?;
                ctl.submit_status = SubmitStatus::Error;
                ctl.error_message = Some("Failed to save session".to_string());
                self.publish(&ctl);
                Err(FocusError::Task(e.to_string()))
            }
        }
    }

    fn finish_submission(
        self: &Arc<Self>,
        snapshot: &SessionSnapshot,
        result: Result<StoredSession, PersistError>,
    ) -> Result<StoredSession> {
        let mut ctl = self.controller()?;

        match result {
            Ok(stored) => {
                // A newer session may have ended while this one was in flight
                if ctl.pending.as_ref() == Some(snapshot) {
                    ctl.pending = None;
                }
                ctl.submit_status = SubmitStatus::Success;
                ctl.error_message = None;
                // Only a finished or untouched timer goes back to the full duration
                if ctl.timer.phase() == TimerPhase::Expired || ctl.timer.session_start().is_none() {
                    ctl.timer.rearm();
                }

                ctl.success_generation += 1;
                schedule_notice_clear(Arc::downgrade(self), Notice::SubmitSuccess, ctl.success_generation);

                self.publish(&ctl);
                self.notify(TimerEvent::SessionSaved(stored.clone()));
                Ok(stored)
            }
            Err(e) => {
                error!("Failed to save focus session: {}", e);
                ctl.submit_status = SubmitStatus::Error;
                ctl.error_message = Some(e.to_string());
                self.publish(&ctl);
                Err(e.into())
            }
        }
    }

    /// Drop the pending summary without saving it
    pub fn dismiss_summary(&self) -> Result<TimerStatus> {
        let mut ctl = self.controller()?;
        if ctl.submit_status == SubmitStatus::Submitting {
            return Err(FocusError::SubmissionInProgress);
        }

        if ctl.pending.take().is_some() {
            info!("Session summary dismissed");
        }
        ctl.submit_status = SubmitStatus::Idle;
        ctl.error_message = None;

        Ok(self.publish(&ctl))
    }

    /// Sessions already stored by the planner API
    pub async fn list_sessions(&self) -> Result<Vec<StoredSession>> {
        Ok(self.store.list_sessions().await?)
    }

    /// Clear a notice unless a newer one of the same kind was raised since
    pub fn clear_notice(&self, notice: Notice, generation: u64) -> Result<()> {
        let mut ctl = self.controller()?;

        let changed = match notice {
            Notice::ExpiryAlert if ctl.alert_generation == generation && ctl.alert_active => {
                ctl.alert_active = false;
                true
            }
            Notice::SubmitSuccess
                if ctl.success_generation == generation && ctl.submit_status == SubmitStatus::Success =>
            {
                ctl.submit_status = SubmitStatus::Idle;
                true
            }
            _ => false,
        };

        if changed {
            self.publish(&ctl);
        }
        Ok(())
    }

    /// Stop the tick task before the process exits
    pub fn shutdown(&self) -> Result<()> {
        let mut ctl = self.controller()?;
        ctl.stop_ticking();
        info!("Focus timer stopped");
        Ok(())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
