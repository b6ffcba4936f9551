use anyhow::Result;
use avatar_planner::config::{load_config, Config};
use colored::Colorize;
use std::path::Path;
use tracing::info;

/// Execute the config show command
///
/// Displays the effective configuration after defaults and environment overrides
pub fn show(config_path: &Path) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());
    info!(path = %config_path.display(), "Loading configuration for display");

    let cfg = load_config(config_path)?;

    println!("{}", "Current Configuration:".green().bold());
    println!();
    println!("{}", toml::to_string_pretty(&cfg)?);

    Ok(())
}

/// Execute the config validate command
///
/// Validates the configuration file and the catalog it selects
pub fn validate(config_path: &Path) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());

    if !config_path.exists() {
        println!(
            "{}",
            format!(
                "! {} not found, using defaults and environment",
                config_path.display()
            )
            .yellow()
        );
    }

    let (cfg, catalog) = super::load_planner(config_path)?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  Listen: {}", listen_address(&cfg));
    println!("  Catalog: {}", catalog_source(&cfg));
    println!(
        "  Avatar Plans: {}, Voice Agents: {}, Hosting Options: {}",
        catalog.avatar_plans.len(),
        catalog.voice_agents.len(),
        catalog.hosting_options.len()
    );
    println!("  USD→INR: {:.2}", cfg.economics.usd_to_inr);
    println!(
        "  Telemetry Store: {}",
        cfg.telemetry.store_path.display()
    );

    info!("Configuration validation successful");
    Ok(())
}

fn listen_address(cfg: &Config) -> String {
    format!("{}:{}", cfg.server.host, cfg.server.port)
}

fn catalog_source(cfg: &Config) -> String {
    cfg.catalog
        .path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "builtin".to_string())
}
