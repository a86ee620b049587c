// src/cli/run.rs — Default command: drive a research query to completion

use std::sync::Arc;

use crate::api::HttpBackend;
use crate::core::controller::Controller;
use crate::core::types::{Citation, DepthLevel, Phase, Report};
use crate::infra::config::Config;
use crate::infra::errors::ScoutError;

use super::progress;

pub async fn run_research(
    query: &str,
    depth: DepthLevel,
    config: &Config,
    quiet: bool,
    json: bool,
) -> anyhow::Result<()> {
    let backend = HttpBackend::new(&config.backend.base_url, config.backend.request_timeout())?;
    let controller = Arc::new(Controller::new(Arc::new(backend), config.polling.clone()));

    let request_id = controller.start(query, depth).await?;
    if !quiet {
        let (min_q, max_q) = depth.question_range();
        eprintln!("[start] request {request_id} ({depth} depth, {min_q}-{max_q} questions)");
    }

    let on_progress = if quiet {
        None
    } else {
        Some(progress::terminal_progress())
    };
    let handle = controller
        .scheduler()
        .arm(Arc::clone(&controller), request_id.clone(), on_progress);

    tokio::select! {
        _ = handle => {}
        _ = tokio::signal::ctrl_c() => {
            controller.reset();
            anyhow::bail!("interrupted; session reset");
        }
    }

    let session = controller.session();
    match session.phase {
        Phase::Completed => {
            let report = match session.report {
                Some(ref report) => report.clone(),
                // Completed but the report fetch failed; one explicit retry
                // before giving up.
                None => controller.fetch_report(&request_id).await?,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report, &controller.session().citations);
            }
            Ok(())
        }
        Phase::Failed => {
            let reason = session
                .error_message
                .unwrap_or_else(|| "research failed".into());
            Err(ScoutError::JobFailed { reason }.into())
        }
        other => anyhow::bail!("research ended in unexpected phase '{other}'"),
    }
}

fn print_report(report: &Report, citations: &[Citation]) {
    println!("# Executive Summary\n");
    println!("{}\n", report.executive_summary);

    for section in &report.sections {
        println!("## {}\n", section.title);
        println!("{}\n", section.content);
    }

    if !report.discrepancy_notes.is_empty() {
        println!("## Source Discrepancies\n");
        for note in &report.discrepancy_notes {
            println!("- {}: {}", note.topic, note.resolution_notes);
        }
        println!();
    }

    if !citations.is_empty() {
        println!("## Sources\n");
        for citation in citations {
            println!(
                "- [{}] {} <{}>",
                citation.id, citation.source_title, citation.source_url
            );
        }
        println!();
    }

    println!(
        "Generated from {} verified sources ({} words, ~{} min read)",
        report.total_sources,
        report.total_word_count,
        report.read_time_minutes()
    );
}
