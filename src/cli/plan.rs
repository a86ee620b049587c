// src/cli/plan.rs — Preview a research plan without executing it

use crate::api::{HttpBackend, ResearchBackend};
use crate::core::types::DepthLevel;
use crate::infra::config::Config;

pub async fn run_plan(query: &str, depth: DepthLevel, config: &Config) -> anyhow::Result<()> {
    let backend = HttpBackend::new(&config.backend.base_url, config.backend.request_timeout())?;
    let plan = backend.plan(query, depth).await?;

    let mut questions = plan.sub_questions;
    questions.sort_by_key(|q| q.priority);

    println!("Research plan for: {}", plan.query);
    if plan.estimated_time_seconds > 0 {
        println!(
            "Depth: {} — estimated {}s",
            plan.depth_level, plan.estimated_time_seconds
        );
    } else {
        println!("Depth: {}", plan.depth_level);
    }
    println!();
    for question in &questions {
        println!("  {}. {}", question.priority, question.text);
    }
    Ok(())
}
