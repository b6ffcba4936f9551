use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricSource {
    ApiTest,
    Documentation,
    StatusPage,
}

/// Latency observed by one source, milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencyObservation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p95: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p99: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcurrencyObservation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_supported: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<LatencyObservation>,
    /// Percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_rate: Option<f64>,
    /// Percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<ConcurrencyObservation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_size: Option<u32>,
}

/// Metrics one source produced for one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedMetrics {
    pub provider: String,
    pub source: MetricSource,
    pub timestamp: DateTime<Utc>,
    pub metrics: ObservedMetrics,
    #[serde(default)]
    pub metadata: ScrapeMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyAggregate {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub p95: f64,
    pub p99: f64,
    pub sample_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateAggregate {
    pub average: f64,
    pub sample_size: usize,
}

/// Summary over every retained batch of a provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<LatencyAggregate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_rate: Option<RateAggregate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<RateAggregate>,
}

impl AggregatedMetrics {
    pub fn is_empty(&self) -> bool {
        self.latency.is_none() && self.error_rate.is_none() && self.uptime.is_none()
    }
}

/// Value at fraction `p` of an ascending sample
///
/// The index is `floor(n × p)`, clamped to the last element.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let index = ((sorted.len() as f64 * p).floor() as usize).min(sorted.len() - 1);
    Some(sorted[index])
}
