// src/api/client.rs — HTTP client for the research backend

use async_trait::async_trait;
use std::time::Duration;

use super::types::{
    CitationsResponse, ExecuteRequest, ExecuteResponse, HealthResponse, StatusResponse,
};
use super::ResearchBackend;
use crate::core::types::{DepthLevel, Report, ResearchPlan};
use crate::infra::errors::ScoutError;

/// reqwest-backed backend client. One client instance per process; the
/// timeout applies to every call, sized for slow job-mutating endpoints.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ScoutError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert a non-2xx response into `ScoutError::Backend`, extracting
    /// the server's `detail` field when the body carries one.
    async fn error_from(response: reqwest::Response) -> ScoutError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        ScoutError::Backend {
            status,
            detail: extract_detail(&body, status),
        }
    }
}

/// Pull the human-readable `detail` out of an error body, falling back to
/// the bare status code.
fn extract_detail(body: &str, status: u16) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {status}"))
}

#[async_trait]
impl ResearchBackend for HttpBackend {
    async fn execute(
        &self,
        query: &str,
        depth_level: DepthLevel,
    ) -> Result<ExecuteResponse, ScoutError> {
        let body = ExecuteRequest {
            id: uuid::Uuid::new_v4().to_string(),
            query: query.to_string(),
            depth_level,
            run_async: true,
        };

        tracing::debug!(depth = %depth_level, "POST /api/research/execute");
        let response = self
            .client
            .post(self.url("/api/research/execute"))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json().await?)
    }

    async fn status(&self, request_id: &str) -> Result<StatusResponse, ScoutError> {
        let response = self
            .client
            .get(self.url(&format!("/api/research/{request_id}/status")))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json().await?)
    }

    async fn report(&self, request_id: &str) -> Result<Report, ScoutError> {
        tracing::debug!(request_id, "GET report");
        let response = self
            .client
            .get(self.url(&format!("/api/research/{request_id}/report")))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json().await?)
    }

    async fn citations(&self, request_id: &str) -> Result<CitationsResponse, ScoutError> {
        let response = self
            .client
            .get(self.url(&format!("/api/research/{request_id}/citations")))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json().await?)
    }

    async fn plan(
        &self,
        query: &str,
        depth_level: DepthLevel,
    ) -> Result<ResearchPlan, ScoutError> {
        // The plan endpoint takes query parameters, not a JSON body.
        tracing::debug!(depth = %depth_level, "POST /api/research/plan");
        let response = self
            .client
            .post(self.url("/api/research/plan"))
            .query(&[("query", query), ("depth_level", depth_level.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json().await?)
    }

    async fn health(&self) -> Result<HealthResponse, ScoutError> {
        let response = self.client.get(self.url("/api/health")).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_detail_from_json_body() {
        assert_eq!(
            extract_detail(r#"{"detail": "rate limited"}"#, 429),
            "rate limited"
        );
    }

    #[test]
    fn test_extract_detail_fallbacks() {
        // Non-JSON body
        assert_eq!(extract_detail("<html>Bad Gateway</html>", 502), "HTTP 502");
        // JSON without a detail field
        assert_eq!(extract_detail(r#"{"error": "nope"}"#, 500), "HTTP 500");
        // detail present but not a string
        assert_eq!(extract_detail(r#"{"detail": 42}"#, 400), "HTTP 400");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let backend =
            HttpBackend::new("http://localhost:8000/", Duration::from_secs(180)).unwrap();
        assert_eq!(
            backend.url("/api/health"),
            "http://localhost:8000/api/health"
        );
    }
}
