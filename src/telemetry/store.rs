use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::models::{percentile, AggregatedMetrics, LatencyAggregate, RateAggregate, ScrapedMetrics};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderRecord {
    /// Most recent batch
    pub latest: Vec<ScrapedMetrics>,
    /// Retained batches, oldest first
    pub history: Vec<Vec<ScrapedMetrics>>,
    pub aggregated: AggregatedMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDatabase {
    pub providers: BTreeMap<String, ProviderRecord>,
    pub last_updated: DateTime<Utc>,
}

impl Default for MetricsDatabase {
    fn default() -> Self {
        Self {
            providers: BTreeMap::new(),
            last_updated: Utc::now(),
        }
    }
}

impl MetricsDatabase {
    /// Append a batch for a provider, drop the oldest beyond `history_batches`
    /// and recompute the provider's aggregate
    pub fn add_batch(&mut self, provider: &str, batch: Vec<ScrapedMetrics>, history_batches: usize) {
        let record = self.providers.entry(provider.to_string()).or_default();

        record.latest = batch.clone();
        record.history.push(batch);
        if record.history.len() > history_batches {
            let excess = record.history.len() - history_batches;
            record.history.drain(..excess);
        }
        record.aggregated = aggregate(&record.history);
        self.last_updated = Utc::now();
    }
}

/// Aggregate every sample across retained batches
pub fn aggregate(history: &[Vec<ScrapedMetrics>]) -> AggregatedMetrics {
    let samples = || history.iter().flatten().map(|m| &m.metrics);

    let mut latencies: Vec<f64> = samples()
        .filter_map(|m| m.latency.as_ref().and_then(|l| l.average))
        .filter(|ms| *ms > 0.0)
        .collect();
    latencies.sort_by(f64::total_cmp);

    let latency = match (latencies.first(), latencies.last()) {
        (Some(&min), Some(&max)) => Some(LatencyAggregate {
            average: latencies.iter().sum::<f64>() / latencies.len() as f64,
            min,
            max,
            p95: percentile(&latencies, 0.95).unwrap_or(max),
            p99: percentile(&latencies, 0.99).unwrap_or(max),
            sample_size: latencies.len(),
        }),
        _ => None,
    };

    AggregatedMetrics {
        latency,
        error_rate: rate_aggregate(samples().filter_map(|m| m.error_rate)),
        uptime: rate_aggregate(samples().filter_map(|m| m.uptime)),
    }
}

fn rate_aggregate(values: impl Iterator<Item = f64>) -> Option<RateAggregate> {
    let values: Vec<f64> = values.collect();
    if values.is_empty() {
        return None;
    }
    Some(RateAggregate {
        average: values.iter().sum::<f64>() / values.len() as f64,
        sample_size: values.len(),
    })
}

/// JSON file holding collected provider metrics
#[derive(Debug, Clone)]
pub struct MetricsStore {
    path: PathBuf,
    history_batches: usize,
}

impl MetricsStore {
    pub fn new(path: impl Into<PathBuf>, history_batches: usize) -> Self {
        Self {
            path: path.into(),
            history_batches: history_batches.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the database; a missing or unreadable file yields an empty one
    pub fn load(&self) -> MetricsDatabase {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Metrics store not found, starting empty");
            return MetricsDatabase::default();
        }

        let parsed = std::fs::read_to_string(&self.path)
            .map_err(anyhow::Error::from)
            .and_then(|content| serde_json::from_str(&content).map_err(anyhow::Error::from));
        match parsed {
            Ok(db) => db,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to load metrics store, starting empty");
                MetricsDatabase::default()
            }
        }
    }

    pub fn save(&self, db: &MetricsDatabase) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(db)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    /// Persist one collection cycle; providers with no results are left untouched
    pub fn record(&self, collected: BTreeMap<String, Vec<ScrapedMetrics>>) -> Result<usize> {
        let mut db = self.load();
        let mut stored = 0;
        for (provider, batch) in collected {
            if batch.is_empty() {
                continue;
            }
            db.add_batch(&provider, batch, self.history_batches);
            stored += 1;
        }
        if stored > 0 {
            self.save(&db)?;
        }
        Ok(stored)
    }

    pub fn aggregated(&self) -> BTreeMap<String, AggregatedMetrics> {
        self.load()
            .providers
            .into_iter()
            .map(|(provider, record)| (provider, record.aggregated))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::models::{LatencyObservation, MetricSource, ObservedMetrics};

    fn sample(latency: Option<f64>, uptime: Option<f64>) -> ScrapedMetrics {
        ScrapedMetrics {
            provider: "heygen".to_string(),
            source: MetricSource::ApiTest,
            timestamp: Utc::now(),
            metrics: ObservedMetrics {
                latency: latency.map(|ms| LatencyObservation {
                    average: Some(ms),
                    ..Default::default()
                }),
                uptime,
                ..Default::default()
            },
            metadata: Default::default(),
        }
    }

    #[test]
    fn test_aggregate_spans_history() {
        let history = vec![
            vec![sample(Some(100.0), Some(99.0))],
            vec![sample(Some(300.0), None), sample(None, Some(97.0))],
        ];
        let aggregated = aggregate(&history);

        let latency = aggregated.latency.unwrap();
        assert_eq!(latency.average, 200.0);
        assert_eq!(latency.min, 100.0);
        assert_eq!(latency.max, 300.0);
        assert_eq!(latency.p95, 300.0);
        assert_eq!(latency.sample_size, 2);
        assert_eq!(aggregated.uptime.unwrap().average, 98.0);
        assert!(aggregated.error_rate.is_none());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut db = MetricsDatabase::default();
        for ms in [10.0, 20.0, 30.0, 40.0] {
            db.add_batch("heygen", vec![sample(Some(ms), None)], 3);
        }

        let record = &db.providers["heygen"];
        assert_eq!(record.history.len(), 3);
        assert_eq!(record.latest.len(), 1);
        assert_eq!(record.aggregated.latency.as_ref().unwrap().min, 20.0);
    }

    #[test]
    fn test_empty_aggregate() {
        assert!(aggregate(&[]).is_empty());
        assert!(aggregate(&[vec![sample(Some(0.0), None)]]).is_empty());
    }
}
