use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::Economics;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub economics: Economics,
    pub catalog: CatalogConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// JSON catalog replacing the built-in one
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub store_path: PathBuf,
    pub rate_limit_per_second: f64,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub samples_per_provider: u32,
    /// Collection batches kept per provider
    pub history_batches: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("data/metrics/metrics-db.json"),
            rate_limit_per_second: 2.0,
            timeout_seconds: 30,
            max_retries: 3,
            samples_per_provider: 10,
            history_batches: 10,
        }
    }
}

/// Load configuration from an optional TOML file overlaid by `AVATAR_PLANNER__*` variables
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("AVATAR_PLANNER").separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.server.port == 0 {
        anyhow::bail!("server.port must be non-zero");
    }

    let economics = &cfg.economics;
    for (field, value) in [
        ("economics.usd_to_inr", economics.usd_to_inr),
        ("economics.minutes_per_call", economics.minutes_per_call),
        ("economics.default_tokens_per_minute", economics.default_tokens_per_minute),
    ] {
        if !value.is_finite() || value <= 0.0 {
            anyhow::bail!("{} must be a positive number, got {}", field, value);
        }
    }
    if !economics.misc_expenses_monthly_inr.is_finite() || economics.misc_expenses_monthly_inr < 0.0 {
        anyhow::bail!(
            "economics.misc_expenses_monthly_inr must be non-negative, got {}",
            economics.misc_expenses_monthly_inr
        );
    }

    let telemetry = &cfg.telemetry;
    if !telemetry.rate_limit_per_second.is_finite() || telemetry.rate_limit_per_second <= 0.0 {
        anyhow::bail!("telemetry.rate_limit_per_second must be positive");
    }
    if telemetry.samples_per_provider == 0 {
        anyhow::bail!("telemetry.samples_per_provider must be at least 1");
    }
    if telemetry.history_batches == 0 {
        anyhow::bail!("telemetry.history_batches must be at least 1");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = Config::default();
        assert!(validate_config(&cfg).is_ok());
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.economics.usd_to_inr, 90.0);
        assert_eq!(cfg.telemetry.history_batches, 10);
    }

    #[test]
    fn test_validate_config_rejects_zero_exchange_rate() {
        let mut cfg = Config::default();
        cfg.economics.usd_to_inr = 0.0;

        let result = validate_config(&cfg);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("economics.usd_to_inr"));
    }

    #[test]
    fn test_validate_config_rejects_zero_samples() {
        let mut cfg = Config::default();
        cfg.telemetry.samples_per_provider = 0;
        assert!(validate_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.telemetry.rate_limit_per_second = -1.0;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert!(cfg.catalog.path.is_none());
    }

    #[test]
    fn test_partial_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 9090\n\n[economics]\nusd_to_inr = 83.5\n\n[telemetry]\nsamples_per_provider = 3"
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.log_level, "info");
        assert_eq!(cfg.economics.usd_to_inr, 83.5);
        assert_eq!(cfg.economics.misc_expenses_monthly_inr, 30_000.0);
        assert_eq!(cfg.telemetry.samples_per_provider, 3);
    }
}
