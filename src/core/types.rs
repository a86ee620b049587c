// src/core/types.rs — Research domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workflow stage of a research session. Wire `status` values map onto
/// these 1:1; `Idle` never appears on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Planning,
    Executing,
    Verifying,
    Synthesizing,
    Completed,
    Failed,
}

impl Phase {
    /// True while the backend is still working and polling should continue.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            Phase::Planning | Phase::Executing | Phase::Verifying | Phase::Synthesizing
        )
    }

    /// Completed or Failed. No automatic transition leaves a terminal phase.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Planning => "planning",
            Phase::Executing => "executing",
            Phase::Verifying => "verifying",
            Phase::Synthesizing => "synthesizing",
            Phase::Completed => "completed",
            Phase::Failed => "failed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Research depth requested at start. Governs the backend's sub-question
/// count and time budget; advisory on the client side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthLevel {
    Quick,
    #[default]
    Standard,
    Comprehensive,
}

impl DepthLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            DepthLevel::Quick => "quick",
            DepthLevel::Standard => "standard",
            DepthLevel::Comprehensive => "comprehensive",
        }
    }

    /// Expected sub-question range for this depth, per the backend planner.
    pub fn question_range(self) -> (u32, u32) {
        match self {
            DepthLevel::Quick => (3, 5),
            DepthLevel::Standard => (5, 7),
            DepthLevel::Comprehensive => (7, 10),
        }
    }
}

impl fmt::Display for DepthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DepthLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quick" => Ok(DepthLevel::Quick),
            "standard" => Ok(DepthLevel::Standard),
            "comprehensive" => Ok(DepthLevel::Comprehensive),
            other => Err(format!(
                "unknown depth level '{other}' (expected quick, standard, or comprehensive)"
            )),
        }
    }
}

/// A section of the narrative report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub word_count: u32,
    #[serde(default)]
    pub citation_ids: Vec<String>,
    #[serde(default)]
    pub category: String,
}

/// A conflict between sources, noted by the backend verifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscrepancyNote {
    pub topic: String,
    #[serde(default)]
    pub resolution_notes: String,
}

/// The completed research report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub query: String,
    pub executive_summary: String,
    #[serde(default)]
    pub sections: Vec<ReportSection>,
    #[serde(default)]
    pub discrepancy_notes: Vec<DiscrepancyNote>,
    #[serde(default)]
    pub total_word_count: u32,
    #[serde(default)]
    pub total_sources: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Report {
    /// Estimated read time at ~200 words per minute, minimum one minute.
    pub fn read_time_minutes(&self) -> u32 {
        self.total_word_count.div_ceil(200).max(1)
    }
}

/// A source reference backing one or more report claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub id: String,
    pub source_title: String,
    pub source_url: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub confidence: f32,
}

/// One sub-question of a research plan preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubQuestion {
    #[serde(default)]
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub status: Option<String>,
}

/// Research plan returned by the plan preview endpoint. No searches have
/// been executed when this comes back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchPlan {
    #[serde(default)]
    pub id: String,
    pub query: String,
    #[serde(default)]
    pub depth_level: DepthLevel,
    pub sub_questions: Vec<SubQuestion>,
    #[serde(default)]
    pub estimated_time_seconds: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
