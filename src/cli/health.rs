// src/cli/health.rs — Backend reachability check

use crate::api::{HttpBackend, ResearchBackend};
use crate::infra::config::Config;

pub async fn run_health(config: &Config) -> anyhow::Result<()> {
    let backend = HttpBackend::new(&config.backend.base_url, config.backend.request_timeout())?;
    match backend.health().await {
        Ok(health) => {
            println!(
                "{} {} — {} ({})",
                health.app_name, health.version, health.status, config.backend.base_url
            );
            Ok(())
        }
        Err(e) => anyhow::bail!("backend unreachable at {}: {e}", config.backend.base_url),
    }
}
