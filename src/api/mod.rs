// src/api/mod.rs — Research backend interface

pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::core::types::{DepthLevel, Report, ResearchPlan};
use crate::infra::errors::ScoutError;

use types::{CitationsResponse, ExecuteResponse, HealthResponse, StatusResponse};

pub use client::HttpBackend;

/// Seam to the research backend, one method per wire operation.
///
/// `HttpBackend` is the production implementation; tests substitute mocks
/// with scripted responses.
#[async_trait]
pub trait ResearchBackend: Send + Sync {
    /// POST /api/research/execute — create an async research job.
    async fn execute(
        &self,
        query: &str,
        depth_level: DepthLevel,
    ) -> Result<ExecuteResponse, ScoutError>;

    /// GET /api/research/{id}/status — current job progress.
    async fn status(&self, request_id: &str) -> Result<StatusResponse, ScoutError>;

    /// GET /api/research/{id}/report — the completed report artifact.
    async fn report(&self, request_id: &str) -> Result<Report, ScoutError>;

    /// GET /api/research/{id}/citations — sources backing the report.
    async fn citations(&self, request_id: &str) -> Result<CitationsResponse, ScoutError>;

    /// POST /api/research/plan — preview the plan without executing searches.
    async fn plan(
        &self,
        query: &str,
        depth_level: DepthLevel,
    ) -> Result<ResearchPlan, ScoutError>;

    /// GET /api/health — backend reachability probe.
    async fn health(&self) -> Result<HealthResponse, ScoutError>;
}
