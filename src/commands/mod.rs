//! Command implementations for the CLI
//!
//! - serve: Start the planner HTTP server
//! - calculate: Rank configurations for one request
//! - catalog: Show the pricing catalog
//! - telemetry: Collect and show provider metrics
//! - config: Configuration display and validation

pub mod calculate;
pub mod catalog;
pub mod config;
pub mod serve;
pub mod telemetry;

use anyhow::Result;
use avatar_planner::catalog::{load_catalog, Catalog};
use avatar_planner::config::{load_config, Config};
use std::path::Path;
use tracing::debug;

/// Load configuration and the catalog it points at
pub fn load_planner(config_path: &Path) -> Result<(Config, Catalog)> {
    let cfg = load_config(config_path)?;
    let catalog = load_catalog(cfg.catalog.path.as_deref(), cfg.economics)?;
    debug!(
        avatar_plans = catalog.avatar_plans.len(),
        voice_agents = catalog.voice_agents.len(),
        "Catalog loaded"
    );
    Ok((cfg, catalog))
}
