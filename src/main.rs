// src/main.rs — Scout entry point

use clap::Parser;

use scout::cli::{self, Cli, Commands};
use scout::infra::config::Config;
use scout::infra::logger;

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    match cli.command {
        Some(Commands::Plan { query, depth }) => {
            let query = cli::join_query(&query)?;
            let depth = depth.unwrap_or(config.research.default_depth);
            cli::plan::run_plan(&query, depth, &config).await
        }
        Some(Commands::Health) => cli::health::run_health(&config).await,
        None => {
            let query = cli::join_query(&cli.query)?;
            let depth = cli.depth.unwrap_or(config.research.default_depth);
            cli::run::run_research(&query, depth, &config, cli.quiet, cli.json).await
        }
    }
}
