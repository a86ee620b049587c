// src/cli/mod.rs — CLI definition (clap derive)

pub mod health;
pub mod plan;
pub mod progress;
pub mod run;

use clap::{Parser, Subcommand};

use crate::core::types::DepthLevel;

/// Minimum query length enforced at the presentation layer before a
/// session is started. The controller itself accepts any non-empty query.
pub const MIN_QUERY_LEN: usize = 10;

#[derive(Parser)]
#[command(
    name = "scout",
    about = "Deep-research client: submit a query, watch progress, retrieve the verified report",
    version
)]
pub struct Cli {
    /// Research query to run (default command when no subcommand given)
    #[arg(trailing_var_arg = true)]
    pub query: Vec<String>,

    /// Research depth: quick, standard, or comprehensive
    #[arg(short, long)]
    pub depth: Option<DepthLevel>,

    /// Suppress progress output (only emit the final report)
    #[arg(long)]
    pub quiet: bool,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Preview the research plan (sub-questions) without executing searches
    Plan {
        /// Query to deconstruct into sub-questions
        query: Vec<String>,

        /// Research depth: quick, standard, or comprehensive
        #[arg(short, long)]
        depth: Option<DepthLevel>,
    },
    /// Check backend reachability
    Health,
}

/// Join CLI words into one query and apply the presentation-layer rules.
pub fn join_query(parts: &[String]) -> anyhow::Result<String> {
    let query = parts.join(" ").trim().to_string();
    if query.is_empty() {
        anyhow::bail!("no research query given. Usage: scout \"<query>\" [--depth standard]");
    }
    if query.chars().count() < MIN_QUERY_LEN {
        anyhow::bail!("query too short — give at least {MIN_QUERY_LEN} characters");
    }
    Ok(query)
}
