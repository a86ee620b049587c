// src/core/session.rs — Session aggregate, reducer, and state store
//
// The session is the single client-side record of one research request.
// All mutation goes through `SessionStore::apply`, which runs the pure
// `reduce` function over (current session, event) under the write lock.
// The reducer owns the transition rules: stale responses are dropped by
// request id, terminal phases are sticky, progress is clamped to [0,100].

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

use crate::api::types::StatusResponse;

use super::types::{Citation, DepthLevel, Phase, Report};

/// Client-side record of one research request's lifecycle and results.
///
/// Exactly one session is live per store; starting a new research request
/// fully replaces the previous session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub request_id: Option<String>,
    pub query: String,
    pub depth_level: DepthLevel,
    pub phase: Phase,
    pub progress_percent: u8,
    pub current_stage: String,
    pub questions_completed: u32,
    pub questions_total: u32,
    pub report: Option<Report>,
    pub citations: Vec<Citation>,
    pub error_message: Option<String>,
    pub is_loading: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            request_id: None,
            query: String::new(),
            depth_level: DepthLevel::Standard,
            phase: Phase::Idle,
            progress_percent: 0,
            current_stage: String::new(),
            questions_completed: 0,
            questions_total: 0,
            report: None,
            citations: Vec::new(),
            error_message: None,
            is_loading: false,
        }
    }
}

impl Session {
    pub fn is_researching(&self) -> bool {
        self.phase.is_active()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn has_error(&self) -> bool {
        self.phase == Phase::Failed
    }

    /// Whether a response addressed to `request_id` belongs to this session.
    fn owns(&self, request_id: &str) -> bool {
        self.request_id.as_deref() == Some(request_id)
    }
}

/// A state transition applied to the session by the controller.
///
/// Events that carry a `request_id` are dropped by the reducer when the id
/// no longer matches the live session, so a slow response for a superseded
/// job can never corrupt a newer one.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// `start` was invoked: replace the session with a fresh active one.
    Started {
        query: String,
        depth_level: DepthLevel,
    },
    /// The backend accepted the job and assigned an id.
    JobAccepted { request_id: String },
    /// A status poll response arrived.
    StatusReceived {
        request_id: String,
        status: StatusResponse,
    },
    /// The completed report was retrieved.
    ReportFetched { request_id: String, report: Report },
    /// Citations were retrieved.
    CitationsFetched {
        request_id: String,
        citations: Vec<Citation>,
    },
    /// Job creation failed before an id was assigned.
    StartFailed { message: String },
    /// The job is lost: polling gave up on an unreachable backend.
    JobFailed { request_id: String, reason: String },
    /// Report retrieval failed after completion. The phase stays Completed
    /// so the fetch can be retried.
    ReportFetchFailed { request_id: String, message: String },
    /// Back to the idle initial state.
    Reset,
}

/// Clamp a server-supplied progress value into the displayable range.
pub fn clamp_percent(raw: i64) -> u8 {
    raw.clamp(0, 100) as u8
}

/// Transition function: apply one event to the session, producing the next
/// session. Pure — every invariant the store guarantees is enforced here.
pub fn reduce(current: Session, event: SessionEvent) -> Session {
    match event {
        SessionEvent::Started { query, depth_level } => Session {
            query,
            depth_level,
            phase: Phase::Planning,
            is_loading: true,
            ..Session::default()
        },

        SessionEvent::JobAccepted { request_id } => {
            // Only the freshly started session is waiting for an id; a late
            // acceptance for an abandoned start has nowhere to land.
            if current.phase != Phase::Planning || current.request_id.is_some() {
                return current;
            }
            Session {
                request_id: Some(request_id),
                phase: Phase::Executing,
                ..current
            }
        }

        SessionEvent::StatusReceived { request_id, status } => {
            if !current.owns(&request_id) {
                tracing::debug!(%request_id, "dropping stale status response");
                return current;
            }
            if current.phase.is_terminal() {
                return current;
            }

            let mut next = Session {
                phase: status.status,
                progress_percent: clamp_percent(status.progress_percent),
                current_stage: status.current_stage,
                questions_completed: status.questions_completed,
                questions_total: status.questions_total,
                ..current
            };
            if status.status == Phase::Failed {
                next.error_message = Some(
                    status
                        .error_message
                        .unwrap_or_else(|| "Research failed".to_string()),
                );
                next.is_loading = false;
            }
            next
        }

        SessionEvent::ReportFetched { request_id, report } => {
            if !current.owns(&request_id) || current.phase == Phase::Failed {
                return current;
            }
            // Storing the report confirms completion, and wins over any
            // still-in-flight poll that would report an earlier stage.
            Session {
                report: Some(report),
                phase: Phase::Completed,
                progress_percent: 100,
                error_message: None,
                is_loading: false,
                ..current
            }
        }

        SessionEvent::CitationsFetched {
            request_id,
            citations,
        } => {
            if !current.owns(&request_id) {
                return current;
            }
            Session {
                citations,
                ..current
            }
        }

        SessionEvent::StartFailed { message } => {
            // Relevant only while the start is pending; a reset or a newer
            // start has already replaced the session otherwise.
            if current.phase != Phase::Planning {
                return current;
            }
            Session {
                phase: Phase::Failed,
                error_message: Some(message),
                is_loading: false,
                ..current
            }
        }

        SessionEvent::JobFailed {
            request_id,
            reason,
        } => {
            if !current.owns(&request_id) || current.phase.is_terminal() {
                return current;
            }
            Session {
                phase: Phase::Failed,
                error_message: Some(reason),
                is_loading: false,
                ..current
            }
        }

        SessionEvent::ReportFetchFailed {
            request_id,
            message,
        } => {
            if !current.owns(&request_id) {
                return current;
            }
            Session {
                error_message: Some(message),
                is_loading: false,
                ..current
            }
        }

        SessionEvent::Reset => Session::default(),
    }
}

/// Shared store for the live session.
///
/// The controller is the sole writer; presentation consumers read cloned
/// snapshots. `apply` holds the write lock for the whole reduction, so a
/// snapshot never observes a half-applied event.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consistent snapshot of the current session.
    pub fn snapshot(&self) -> Session {
        self.inner.read().expect("session lock poisoned").clone()
    }

    /// Apply one event through the reducer. Returns the resulting phase so
    /// callers driving the poll loop can decide whether to continue.
    pub fn apply(&self, event: SessionEvent) -> Phase {
        let mut session = self.inner.write().expect("session lock poisoned");
        let next = reduce(session.clone(), event);
        *session = next;
        session.phase
    }
}
