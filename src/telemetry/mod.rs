//! Provider latency and uptime telemetry
//!
//! Collected independently of the planner; nothing in the cost engine reads it.

pub mod models;
pub mod providers;
pub mod scraper;
pub mod store;

pub use models::{AggregatedMetrics, MetricSource, ScrapedMetrics};
pub use providers::{default_latency_estimates, known_endpoints, ProviderEndpoints};
pub use scraper::Scraper;
pub use store::{MetricsDatabase, MetricsStore};

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use crate::config::TelemetryConfig;

/// What is known about one provider's responsiveness
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_latency_ms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregated: Option<AggregatedMetrics>,
}

/// Default latency estimates merged with stored aggregates, keyed by provider id
pub fn provider_metrics(store: &MetricsStore) -> BTreeMap<String, ProviderMetrics> {
    let mut result: BTreeMap<String, ProviderMetrics> = default_latency_estimates()
        .into_iter()
        .map(|(provider, ms)| {
            (
                provider,
                ProviderMetrics {
                    default_latency_ms: Some(ms),
                    aggregated: None,
                },
            )
        })
        .collect();

    for (provider, aggregated) in store.aggregated() {
        result
            .entry(provider)
            .or_insert(ProviderMetrics {
                default_latency_ms: None,
                aggregated: None,
            })
            .aggregated = Some(aggregated);
    }

    result
}

/// Run one collection cycle against `endpoints` and persist the results
///
/// Returns the number of providers for which at least one source answered.
pub async fn run_collection(config: &TelemetryConfig, endpoints: &[ProviderEndpoints]) -> Result<usize> {
    let scraper = Scraper::new(config)?;
    let store = MetricsStore::new(&config.store_path, config.history_batches);

    info!(providers = endpoints.len(), "Starting metrics collection");
    let collected = scraper.collect_all(endpoints).await;
    let stored = store.record(collected)?;
    info!(
        stored = stored,
        path = %store.path().display(),
        "Metrics collection completed"
    );

    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_metrics_without_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = MetricsStore::new(dir.path().join("metrics.json"), 10);

        let metrics = provider_metrics(&store);
        assert_eq!(metrics.len(), 12);
        assert_eq!(metrics["tavus"].default_latency_ms, Some(350));
        assert!(metrics["tavus"].aggregated.is_none());
    }
}
