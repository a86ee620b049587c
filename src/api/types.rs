// src/api/types.rs — Wire types for the research backend

use serde::{Deserialize, Serialize};

use crate::core::types::{Citation, DepthLevel, Phase};

/// POST /api/research/execute request body. The client supplies a job id;
/// the backend may replace it, and the response id is authoritative.
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteRequest {
    pub id: String,
    pub query: String,
    pub depth_level: DepthLevel,
    #[serde(rename = "async")]
    pub run_async: bool,
}

/// POST /api/research/execute response.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteResponse {
    pub request_id: String,
    #[serde(default)]
    pub status: Option<Phase>,
    #[serde(default)]
    pub message: Option<String>,
}

/// GET /api/research/{id}/status response.
///
/// `progress_percent` is kept wide here: the server owns the value and has
/// been seen sending out-of-range numbers, so clamping happens at the
/// session merge, not at deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: Phase,
    #[serde(default)]
    pub progress_percent: i64,
    #[serde(default)]
    pub current_stage: String,
    #[serde(default)]
    pub questions_completed: u32,
    #[serde(default)]
    pub questions_total: u32,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// GET /api/research/{id}/citations response.
#[derive(Debug, Clone, Deserialize)]
pub struct CitationsResponse {
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
    #[serde(default)]
    pub total_sources: u32,
}

/// GET /api/health response.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub version: String,
}
