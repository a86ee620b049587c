// src/core/scheduler.rs — Polling scheduler
//
// Timed driver for status polling. One cycle per job: armed after a
// successful start, polls at a fixed cadence, stops deterministically on
// a terminal phase, on reset, or when disarmed. Polls are strictly
// sequential — the next sleep begins only after the prior poll resolves,
// so a slow backend can never stack concurrent requests for one job.

use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::infra::config::PollingConfig;

use super::controller::Controller;
use super::session::{Session, SessionEvent};
use super::types::Phase;

/// Callback invoked with a fresh snapshot after every applied poll.
pub type ProgressCallback = Arc<dyn Fn(&Session) + Send + Sync>;

/// Lifecycle of the scheduler across polling cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No cycle has run yet.
    Idle,
    /// A cycle is polling.
    Armed,
    /// The last cycle ended. A new `arm` starts a fresh one.
    Stopped,
}

pub struct PollScheduler {
    config: PollingConfig,
    state: Arc<Mutex<SchedulerState>>,
    shutdown_tx: Mutex<Option<broadcast::Sender<()>>>,
}

impl PollScheduler {
    pub fn new(config: PollingConfig) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(SchedulerState::Idle)),
            shutdown_tx: Mutex::new(None),
        }
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.lock().expect("scheduler lock poisoned")
    }

    /// Begin a polling cycle bound to `request_id`. Any previous cycle is
    /// stopped first; late responses from it are dropped by the store's
    /// request-id check.
    pub fn arm(
        &self,
        controller: Arc<Controller>,
        request_id: String,
        on_progress: Option<ProgressCallback>,
    ) -> JoinHandle<()> {
        self.disarm();

        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);
        *self.shutdown_tx.lock().expect("scheduler lock poisoned") = Some(shutdown_tx);
        *self.state.lock().expect("scheduler lock poisoned") = SchedulerState::Armed;

        let state = Arc::clone(&self.state);
        let interval = self.config.interval();
        let max_misses = self.config.max_consecutive_misses;

        tokio::spawn(async move {
            tracing::debug!(
                %request_id,
                interval_ms = interval.as_millis() as u64,
                "polling armed"
            );
            let mut misses: u32 = 0;

            loop {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {
                        match controller.poll_once(&request_id).await {
                            Ok(phase) => {
                                misses = 0;
                                if let Some(cb) = &on_progress {
                                    cb(&controller.session());
                                }
                                match phase {
                                    Phase::Completed => {
                                        controller.finalize(&request_id).await;
                                        if let Some(cb) = &on_progress {
                                            cb(&controller.session());
                                        }
                                        break;
                                    }
                                    Phase::Failed => break,
                                    _ => {}
                                }
                            }
                            Err(e) => {
                                misses += 1;
                                tracing::warn!(%request_id, misses, "status poll missed: {e}");
                                if max_misses > 0 && misses >= max_misses {
                                    controller.store().apply(SessionEvent::JobFailed {
                                        request_id: request_id.clone(),
                                        reason: format!(
                                            "Backend unreachable: {misses} consecutive status polls failed"
                                        ),
                                    });
                                    if let Some(cb) = &on_progress {
                                        cb(&controller.session());
                                    }
                                    break;
                                }
                            }
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        tracing::debug!(%request_id, "polling disarmed");
                        break;
                    }
                }
            }

            *state.lock().expect("scheduler lock poisoned") = SchedulerState::Stopped;
            tracing::debug!(%request_id, "polling stopped");
        })
    }

    /// Stop the current cycle, if any. Safe to call at any time.
    pub fn disarm(&self) {
        if let Some(tx) = self
            .shutdown_tx
            .lock()
            .expect("scheduler lock poisoned")
            .take()
        {
            let _ = tx.send(());
        }
    }
}
