// tests/scheduler_test.rs — Integration test: polling scheduler with mock backend
//
// Uses a short real interval (10ms) so each test finishes in well under a
// second while exercising the actual timing loop.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use scout::api::types::{CitationsResponse, ExecuteResponse, HealthResponse, StatusResponse};
use scout::api::ResearchBackend;
use scout::core::controller::Controller;
use scout::core::scheduler::SchedulerState;
use scout::core::types::{Citation, DepthLevel, Phase, Report, ResearchPlan};
use scout::infra::config::PollingConfig;
use scout::infra::errors::ScoutError;

/// Mock backend that serves a scripted status sequence, then repeats a
/// fallback status forever. `Err(code)` entries are scripted HTTP failures.
struct SequenceBackend {
    statuses: Mutex<VecDeque<Result<StatusResponse, u16>>>,
    fallback: Result<StatusResponse, u16>,
    report_calls: AtomicUsize,
    citation_calls: AtomicUsize,
}

impl SequenceBackend {
    fn new(
        statuses: Vec<Result<StatusResponse, u16>>,
        fallback: Result<StatusResponse, u16>,
    ) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            fallback,
            report_calls: AtomicUsize::new(0),
            citation_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ResearchBackend for SequenceBackend {
    async fn execute(
        &self,
        _query: &str,
        _depth_level: DepthLevel,
    ) -> Result<ExecuteResponse, ScoutError> {
        Ok(ExecuteResponse {
            request_id: "job-1".into(),
            status: Some(Phase::Planning),
            message: None,
        })
    }

    async fn status(&self, _request_id: &str) -> Result<StatusResponse, ScoutError> {
        let next = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        next.map_err(|code| ScoutError::Backend {
            status: code,
            detail: "scripted failure".into(),
        })
    }

    async fn report(&self, request_id: &str) -> Result<Report, ScoutError> {
        self.report_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Report {
            id: "rep-1".into(),
            request_id: request_id.to_string(),
            query: String::new(),
            executive_summary: "done".into(),
            sections: vec![],
            discrepancy_notes: vec![],
            total_word_count: 600,
            total_sources: 4,
            created_at: None,
        })
    }

    async fn citations(&self, request_id: &str) -> Result<CitationsResponse, ScoutError> {
        self.citation_calls.fetch_add(1, Ordering::SeqCst);
        Ok(CitationsResponse {
            request_id: request_id.to_string(),
            citations: vec![Citation {
                id: "c1".into(),
                source_title: "source".into(),
                source_url: "https://example.com".into(),
                excerpt: String::new(),
                timestamp: None,
                confidence: 0.8,
            }],
            total_sources: 1,
        })
    }

    async fn plan(
        &self,
        _query: &str,
        _depth_level: DepthLevel,
    ) -> Result<ResearchPlan, ScoutError> {
        Err(ScoutError::Backend {
            status: 501,
            detail: "plan not scripted".into(),
        })
    }

    async fn health(&self) -> Result<HealthResponse, ScoutError> {
        Ok(HealthResponse {
            status: "healthy".into(),
            app_name: "mock".into(),
            version: "0.0.0".into(),
        })
    }
}

fn status(phase: Phase, percent: i64) -> StatusResponse {
    StatusResponse {
        status: phase,
        progress_percent: percent,
        current_stage: String::new(),
        questions_completed: 0,
        questions_total: 0,
        error_message: None,
    }
}

fn fast_polling(max_consecutive_misses: u32) -> PollingConfig {
    PollingConfig {
        interval_ms: 10,
        max_consecutive_misses,
    }
}

async fn start_and_arm(
    controller: &Arc<Controller>,
    observed: Option<Arc<Mutex<Vec<Phase>>>>,
) -> tokio::task::JoinHandle<()> {
    let request_id = controller
        .start("Research Tesla Q4 2023 performance", DepthLevel::Standard)
        .await
        .unwrap();

    let on_progress = observed.map(|seen| {
        Arc::new(move |session: &scout::core::session::Session| {
            seen.lock().unwrap().push(session.phase);
        }) as scout::core::scheduler::ProgressCallback
    });
    controller
        .scheduler()
        .arm(Arc::clone(controller), request_id, on_progress)
}

#[tokio::test]
async fn test_scheduler_runs_to_completion() {
    let backend = Arc::new(SequenceBackend::new(
        vec![
            Ok(status(Phase::Executing, 30)),
            Ok(status(Phase::Verifying, 60)),
            Ok(status(Phase::Synthesizing, 80)),
            Ok(status(Phase::Completed, 100)),
        ],
        Ok(status(Phase::Completed, 100)),
    ));
    let controller = Arc::new(Controller::new(
        Arc::clone(&backend) as Arc<dyn ResearchBackend>,
        fast_polling(0),
    ));

    let observed = Arc::new(Mutex::new(Vec::new()));
    let handle = start_and_arm(&controller, Some(Arc::clone(&observed))).await;
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("scheduler did not stop")
        .unwrap();

    let session = controller.session();
    assert_eq!(session.phase, Phase::Completed);
    assert_eq!(session.progress_percent, 100);
    assert!(session.report.is_some(), "report fetched on completion");
    assert_eq!(session.citations.len(), 1, "citations fetched on completion");
    assert_eq!(backend.report_calls.load(Ordering::SeqCst), 1);
    assert_eq!(controller.scheduler().state(), SchedulerState::Stopped);

    let seen = observed.lock().unwrap();
    assert!(seen.contains(&Phase::Executing));
    assert_eq!(*seen.last().unwrap(), Phase::Completed);
}

#[tokio::test]
async fn test_scheduler_stops_on_server_failure() {
    let mut failed = status(Phase::Failed, 40);
    failed.error_message = Some("search provider quota exhausted".into());

    let backend = Arc::new(SequenceBackend::new(
        vec![Ok(status(Phase::Executing, 20)), Ok(failed)],
        Err(410),
    ));
    let controller = Arc::new(Controller::new(
        Arc::clone(&backend) as Arc<dyn ResearchBackend>,
        fast_polling(0),
    ));

    let handle = start_and_arm(&controller, None).await;
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("scheduler did not stop")
        .unwrap();

    let session = controller.session();
    assert_eq!(session.phase, Phase::Failed);
    assert_eq!(
        session.error_message.as_deref(),
        Some("search provider quota exhausted")
    );
    // No report fetch for a failed job.
    assert_eq!(backend.report_calls.load(Ordering::SeqCst), 0);
    assert_eq!(controller.scheduler().state(), SchedulerState::Stopped);
}

#[tokio::test]
async fn test_scheduler_gives_up_after_consecutive_misses() {
    let backend = Arc::new(SequenceBackend::new(vec![], Err(503)));
    let controller = Arc::new(Controller::new(
        Arc::clone(&backend) as Arc<dyn ResearchBackend>,
        fast_polling(3),
    ));

    let handle = start_and_arm(&controller, None).await;
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("scheduler did not stop")
        .unwrap();

    let session = controller.session();
    assert_eq!(session.phase, Phase::Failed);
    assert!(session
        .error_message
        .as_deref()
        .unwrap()
        .contains("unreachable"));
}

#[tokio::test]
async fn test_miss_counter_resets_on_success() {
    // Two misses, one success, two misses, then completion: with a bound
    // of 3 the cycle must survive because misses are consecutive.
    let backend = Arc::new(SequenceBackend::new(
        vec![
            Err(503),
            Err(503),
            Ok(status(Phase::Executing, 50)),
            Err(503),
            Err(503),
            Ok(status(Phase::Completed, 100)),
        ],
        Ok(status(Phase::Completed, 100)),
    ));
    let controller = Arc::new(Controller::new(
        Arc::clone(&backend) as Arc<dyn ResearchBackend>,
        fast_polling(3),
    ));

    let handle = start_and_arm(&controller, None).await;
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("scheduler did not stop")
        .unwrap();

    assert_eq!(controller.session().phase, Phase::Completed);
}

#[tokio::test]
async fn test_reset_disarms_scheduler() {
    // The backend never reaches a terminal phase.
    let backend = Arc::new(SequenceBackend::new(vec![], Ok(status(Phase::Executing, 10))));
    let controller = Arc::new(Controller::new(
        Arc::clone(&backend) as Arc<dyn ResearchBackend>,
        fast_polling(0),
    ));

    let handle = start_and_arm(&controller, None).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    controller.reset();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("reset did not stop the scheduler")
        .unwrap();

    let session = controller.session();
    assert_eq!(session.phase, Phase::Idle);
    assert_eq!(session.request_id, None);
    assert_eq!(controller.scheduler().state(), SchedulerState::Stopped);
}

#[tokio::test]
async fn test_rearming_stops_previous_cycle() {
    let backend = Arc::new(SequenceBackend::new(vec![], Ok(status(Phase::Executing, 10))));
    let controller = Arc::new(Controller::new(
        Arc::clone(&backend) as Arc<dyn ResearchBackend>,
        fast_polling(0),
    ));

    let first = start_and_arm(&controller, None).await;
    tokio::time::sleep(Duration::from_millis(30)).await;

    // Arming again (same job) replaces the first cycle.
    let second = controller
        .scheduler()
        .arm(Arc::clone(&controller), "job-1".to_string(), None);
    tokio::time::timeout(Duration::from_secs(2), first)
        .await
        .expect("first cycle still running after rearm")
        .unwrap();

    controller.reset();
    tokio::time::timeout(Duration::from_secs(2), second)
        .await
        .expect("second cycle still running after reset")
        .unwrap();
}
