use anyhow::Result;
use avatar_planner::server;
use std::path::Path;
use tracing::info;

/// Execute the serve command
///
/// Runs in the foreground until SIGTERM or SIGINT. SIGHUP reloads the catalog.
pub async fn execute(config_path: &Path) -> Result<()> {
    let (cfg, catalog) = super::load_planner(config_path)?;

    info!(
        config = %config_path.display(),
        catalog = cfg
            .catalog
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "builtin".to_string()),
        "Starting Avatar Planner"
    );

    server::start_server(cfg, config_path.to_path_buf(), catalog).await
}
