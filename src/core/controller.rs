// src/core/controller.rs — Job lifecycle controller
//
// Owns the backend seam, the session store, and the polling scheduler.
// The controller is the only writer of session state: network results are
// converted into `SessionEvent`s here and never escape to consumers
// except as the typed errors of `start` and `fetch_report`.

use std::sync::Arc;

use crate::api::ResearchBackend;
use crate::infra::config::PollingConfig;
use crate::infra::errors::ScoutError;

use super::scheduler::PollScheduler;
use super::session::{Session, SessionEvent, SessionStore};
use super::types::{Citation, DepthLevel, Phase, Report};

pub struct Controller {
    backend: Arc<dyn ResearchBackend>,
    store: SessionStore,
    scheduler: PollScheduler,
}

impl Controller {
    pub fn new(backend: Arc<dyn ResearchBackend>, polling: PollingConfig) -> Self {
        Self {
            backend,
            store: SessionStore::new(),
            scheduler: PollScheduler::new(polling),
        }
    }

    /// Store handle for consumers that subscribe to snapshots.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Snapshot of the live session for rendering.
    pub fn session(&self) -> Session {
        self.store.snapshot()
    }

    /// The polling scheduler owned by this controller. Armed by the caller
    /// after a successful `start`; a failed start must leave it untouched.
    pub fn scheduler(&self) -> &PollScheduler {
        &self.scheduler
    }

    /// Create a research job. On success the session is Executing and the
    /// returned id is ready for polling; on failure the session is Failed
    /// and the scheduler must not be armed.
    pub async fn start(
        &self,
        query: &str,
        depth_level: DepthLevel,
    ) -> Result<String, ScoutError> {
        // A new session fully replaces the previous one, including any
        // polling cycle still bound to the old job.
        self.scheduler.disarm();
        self.store.apply(SessionEvent::Started {
            query: query.to_string(),
            depth_level,
        });

        match self.backend.execute(query, depth_level).await {
            Ok(response) => {
                tracing::info!(request_id = %response.request_id, "research started");
                self.store.apply(SessionEvent::JobAccepted {
                    request_id: response.request_id.clone(),
                });
                Ok(response.request_id)
            }
            Err(e) => {
                let message = e.detail();
                self.store.apply(SessionEvent::StartFailed {
                    message: message.clone(),
                });
                Err(ScoutError::StartFailed { message })
            }
        }
    }

    /// Poll job status once and merge the result. Transport failures are
    /// transient: the failure is logged, the previous phase is returned,
    /// and polling continues.
    pub async fn poll(&self, request_id: &str) -> Phase {
        match self.poll_once(request_id).await {
            Ok(phase) => phase,
            Err(e) => {
                tracing::warn!(request_id, "status poll failed: {e}");
                self.store.snapshot().phase
            }
        }
    }

    /// Raw poll used by the scheduler, which needs to observe misses in
    /// order to bound them.
    pub(crate) async fn poll_once(&self, request_id: &str) -> Result<Phase, ScoutError> {
        let status = self.backend.status(request_id).await?;
        Ok(self.store.apply(SessionEvent::StatusReceived {
            request_id: request_id.to_string(),
            status,
        }))
    }

    /// Retrieve the completed report. Idempotent: once stored, the cached
    /// report is returned without another network call. A fetch failure
    /// leaves the phase Completed so the caller can retry.
    pub async fn fetch_report(&self, request_id: &str) -> Result<Report, ScoutError> {
        if let Some(report) = self.store.snapshot().report {
            return Ok(report);
        }

        match self.backend.report(request_id).await {
            Ok(report) => {
                self.store.apply(SessionEvent::ReportFetched {
                    request_id: request_id.to_string(),
                    report: report.clone(),
                });
                Ok(report)
            }
            Err(e) => {
                let message = e.detail();
                self.store.apply(SessionEvent::ReportFetchFailed {
                    request_id: request_id.to_string(),
                    message: message.clone(),
                });
                Err(ScoutError::ReportFetchFailed { message })
            }
        }
    }

    /// Best-effort citations fetch. Citations are supplementary, so any
    /// failure is logged and yields an empty list.
    pub async fn fetch_citations(&self, request_id: &str) -> Vec<Citation> {
        match self.backend.citations(request_id).await {
            Ok(response) => {
                let citations = response.citations;
                self.store.apply(SessionEvent::CitationsFetched {
                    request_id: request_id.to_string(),
                    citations: citations.clone(),
                });
                citations
            }
            Err(e) => {
                tracing::warn!(request_id, "citations fetch failed: {e}");
                Vec::new()
            }
        }
    }

    /// The job completed: retrieve the artifacts. The report fetch happens
    /// effectively once per session and citations are best-effort.
    pub(crate) async fn finalize(&self, request_id: &str) {
        if let Err(e) = self.fetch_report(request_id).await {
            tracing::warn!(request_id, "report fetch after completion failed: {e}");
        }
        self.fetch_citations(request_id).await;
    }

    /// Replace the session with the idle initial state and stop polling.
    pub fn reset(&self) {
        self.scheduler.disarm();
        self.store.apply(SessionEvent::Reset);
    }
}
