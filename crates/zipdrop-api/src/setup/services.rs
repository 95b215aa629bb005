//! Service initialization

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use zipdrop_core::Config;
use zipdrop_services::ArchiveWorkflow;

/// Build the archive workflow and wrap it in the shared state
pub fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let workflow_config = config.workflow();

    let workflow = ArchiveWorkflow::from_config(&workflow_config)
        .context("Failed to initialize archive workflow")?;

    tracing::info!(
        relay_url = %workflow_config.relay_url,
        relay_enabled = workflow_config.relay_enabled,
        fetch_timeout_secs = workflow_config.fetch_timeout.as_secs(),
        relay_timeout_secs = workflow_config.relay_timeout.as_secs(),
        fetch_concurrency = workflow_config.fetch_concurrency,
        "Archive workflow initialized"
    );

    Ok(Arc::new(AppState::new(workflow)))
}
