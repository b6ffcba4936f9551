use anyhow::Result;
use arc_swap::ArcSwap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use crate::catalog::{load_catalog, Catalog};

/// Shutdown signal types
#[derive(Debug, Clone, Copy)]
pub enum ShutdownSignal {
    /// Graceful shutdown (drain connections)
    Graceful,
}

/// Setup signal handlers for the server
///
/// Handles:
/// - SIGTERM/SIGINT: Graceful shutdown
/// - SIGHUP: Catalog reload from the configuration at `config_path`
#[cfg(unix)]
pub fn setup_signal_handlers(
    config_path: PathBuf,
    catalog: Arc<ArcSwap<Catalog>>,
) -> (broadcast::Sender<ShutdownSignal>, tokio::task::JoinHandle<()>) {
    let (shutdown_tx, _) = broadcast::channel(16);
    let tx_clone = shutdown_tx.clone();

    let handle = tokio::spawn(async move {
        let mut sigterm = signal(SignalKind::terminate()).expect("Failed to setup SIGTERM handler");
        let mut sigint = signal(SignalKind::interrupt()).expect("Failed to setup SIGINT handler");
        let mut sighup = signal(SignalKind::hangup()).expect("Failed to setup SIGHUP handler");

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("SIGTERM received, initiating graceful shutdown");
                    let _ = tx_clone.send(ShutdownSignal::Graceful);
                    break;
                }
                _ = sigint.recv() => {
                    info!("SIGINT received, initiating graceful shutdown");
                    let _ = tx_clone.send(ShutdownSignal::Graceful);
                    break;
                }
                _ = sighup.recv() => {
                    info!("SIGHUP received, reloading catalog");
                    if let Err(e) = reload_catalog(&config_path, &catalog) {
                        error!("Failed to reload catalog, keeping previous one: {}", e);
                    }
                }
            }
        }
    });

    (shutdown_tx, handle)
}

/// Windows placeholder - only Ctrl+C is supported
#[cfg(not(unix))]
pub fn setup_signal_handlers(
    _config_path: PathBuf,
    _catalog: Arc<ArcSwap<Catalog>>,
) -> (broadcast::Sender<ShutdownSignal>, tokio::task::JoinHandle<()>) {
    let (shutdown_tx, _) = broadcast::channel(16);
    let tx_clone = shutdown_tx.clone();

    let handle = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl+C received, initiating shutdown");
                let _ = tx_clone.send(ShutdownSignal::Graceful);
            }
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
            }
        }
    });

    (shutdown_tx, handle)
}

/// Reload configuration and catalog, then swap the catalog atomically
///
/// If loading or validation fails the current catalog stays in place.
pub fn reload_catalog(config_path: &Path, catalog: &ArcSwap<Catalog>) -> Result<()> {
    let config = crate::config::load_config(config_path)?;
    let new_catalog = load_catalog(config.catalog.path.as_deref(), config.economics)?;

    info!(
        avatar_plans = new_catalog.avatar_plans.len(),
        voice_agents = new_catalog.voice_agents.len(),
        hosting_options = new_catalog.hosting_options.len(),
        "Catalog reloaded"
    );
    catalog.store(Arc::new(new_catalog));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_setup_signal_handlers() {
        let catalog = Arc::new(ArcSwap::from_pointee(Catalog::builtin().unwrap()));
        let (shutdown_tx, _handle) = setup_signal_handlers(PathBuf::from("config.toml"), catalog);

        let mut rx = shutdown_tx.subscribe();
        shutdown_tx.send(ShutdownSignal::Graceful).unwrap();

        let received = rx.recv().await.unwrap();
        assert!(matches!(received, ShutdownSignal::Graceful));
    }

    #[test]
    fn test_reload_applies_new_economics() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[economics]\nusd_to_inr = 85.0").unwrap();

        let catalog = ArcSwap::from_pointee(Catalog::builtin().unwrap());
        reload_catalog(&path, &catalog).unwrap();
        assert_eq!(catalog.load().economics.usd_to_inr, 85.0);
    }

    #[test]
    fn test_failed_reload_keeps_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[catalog]\npath = \"{}\"", dir.path().join("missing.json").display()).unwrap();

        let catalog = ArcSwap::from_pointee(Catalog::builtin().unwrap());
        assert!(reload_catalog(&path, &catalog).is_err());
        assert_eq!(catalog.load().avatar_plans.len(), 16);
    }
}
