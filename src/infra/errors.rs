// src/infra/errors.rs — Error types for Scout

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Failed to start research: {message}")]
    StartFailed { message: String },

    #[error("Research failed: {reason}")]
    JobFailed { reason: String },

    // The job itself succeeded; only the artifact retrieval failed.
    #[error("Failed to fetch report: {message}")]
    ReportFetchFailed { message: String },

    #[error("Backend returned HTTP {status}: {detail}")]
    Backend { status: u16, detail: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScoutError {
    /// Human-readable description for session error fields. Prefers the
    /// server's `detail` body over the full error rendering.
    pub fn detail(&self) -> String {
        match self {
            ScoutError::Backend { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}
