//! Best-effort collection of latency, error-rate and uptime figures
//!
//! Three sources per provider: its documentation page, timed requests against
//! its public API, and its status page. A failing source is logged and skipped.

use anyhow::Result;
use chrono::Utc;
use regex::Regex;
use reqwest::{Client, Method};
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::models::{
    percentile, ConcurrencyObservation, LatencyObservation, MetricSource, ObservedMetrics,
    ScrapeMetadata, ScrapedMetrics,
};
use super::providers::ProviderEndpoints;
use crate::config::TelemetryConfig;

const USER_AGENTS: [&str; 3] = [
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36",
];

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static LATENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:latency|response time|delay)[:\s]+(\d+)\s*ms").unwrap());
static ERROR_RATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:error rate|failure rate)[:\s]+(\d+(?:\.\d+)?)\s*%").unwrap()
});
static UPTIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:uptime|availability)[:\s]+(\d+(?:\.\d+)?)\s*%").unwrap()
});
static CONCURRENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:concurrent|concurrency)[:\s]+(\d+)").unwrap());
/// Elements whose class names a status or indicator, or that carry `data-status`
const STATUS_SELECTOR: &str = r#"[class*="status"], [class*="indicator"], [data-status]"#;

/// Page text with markup removed
fn page_text(html: &str) -> String {
    let text = SCRIPT_RE.replace_all(html, " ");
    TAG_RE.replace_all(&text, " ").into_owned()
}

/// Metrics mentioned in free text
pub fn extract_documented_metrics(text: &str) -> ObservedMetrics {
    let latencies: Vec<f64> = LATENCY_RE
        .captures_iter(text)
        .filter_map(|c| c[1].parse::<f64>().ok())
        .filter(|ms| *ms > 0.0)
        .collect();

    let latency = if latencies.is_empty() {
        None
    } else {
        Some(LatencyObservation {
            average: Some(latencies.iter().sum::<f64>() / latencies.len() as f64),
            min: latencies.iter().copied().reduce(f64::min),
            max: latencies.iter().copied().reduce(f64::max),
            p95: None,
            p99: None,
        })
    };

    ObservedMetrics {
        latency,
        error_rate: ERROR_RATE_RE
            .captures(text)
            .and_then(|c| c[1].parse().ok()),
        uptime: UPTIME_RE.captures(text).and_then(|c| c[1].parse().ok()),
        concurrency: CONCURRENCY_RE
            .captures(text)
            .and_then(|c| c[1].parse().ok())
            .map(|max| ConcurrencyObservation {
                max_supported: Some(max),
            }),
    }
}

/// Uptime from a status page: the share of status indicators that read
/// operational, else an explicit percentage in the page text
pub fn extract_status_uptime(html: &str) -> Option<f64> {
    let document = Html::parse_document(html);
    let indicators: Vec<String> = Selector::parse(STATUS_SELECTOR)
        .map(|selector| {
            document
                .select(&selector)
                .map(|el| el.text().collect::<String>().to_lowercase())
                .collect()
        })
        .unwrap_or_default();

    if indicators.is_empty() {
        let text = page_text(html);
        return UPTIME_RE.captures(&text).and_then(|c| c[1].parse().ok());
    }

    let operational = indicators
        .iter()
        .filter(|s| s.contains("operational") || s.contains("up") || s.contains("healthy"))
        .count();
    Some(operational as f64 / indicators.len() as f64 * 100.0)
}

/// Latency summary of a timed sample, milliseconds
pub fn summarize_latencies(latencies: &[f64]) -> Option<LatencyObservation> {
    if latencies.is_empty() {
        return None;
    }
    let mut sorted = latencies.to_vec();
    sorted.sort_by(f64::total_cmp);

    Some(LatencyObservation {
        average: Some(sorted.iter().sum::<f64>() / sorted.len() as f64),
        min: sorted.first().copied(),
        max: sorted.last().copied(),
        p95: percentile(&sorted, 0.95),
        p99: percentile(&sorted, 0.99),
    })
}

pub struct Scraper {
    client: Client,
    samples: u32,
    max_retries: u32,
    pause: Duration,
}

impl Scraper {
    pub fn new(config: &TelemetryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            samples: config.samples_per_provider,
            max_retries: config.max_retries,
            pause: Duration::from_secs_f64(1.0 / config.rate_limit_per_second),
        })
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENTS[0])
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to fetch {}: {}", url, e))?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to fetch {}: HTTP {}", url, response.status());
        }

        Ok(response.text().await?)
    }

    pub async fn scrape_documentation(&self, provider: &str, url: &str) -> Result<ScrapedMetrics> {
        let html = self.fetch_page(url).await?;
        let metrics = extract_documented_metrics(&page_text(&html));

        Ok(ScrapedMetrics {
            provider: provider.to_string(),
            source: MetricSource::Documentation,
            timestamp: Utc::now(),
            metrics,
            metadata: ScrapeMetadata {
                endpoint: Some(url.to_string()),
                ..Default::default()
            },
        })
    }

    pub async fn scrape_status_page(&self, provider: &str, url: &str) -> Result<ScrapedMetrics> {
        let html = self.fetch_page(url).await?;

        Ok(ScrapedMetrics {
            provider: provider.to_string(),
            source: MetricSource::StatusPage,
            timestamp: Utc::now(),
            metrics: ObservedMetrics {
                uptime: extract_status_uptime(&html),
                ..Default::default()
            },
            metadata: ScrapeMetadata {
                endpoint: Some(url.to_string()),
                ..Default::default()
            },
        })
    }

    /// Time `samples` requests against an API endpoint
    ///
    /// Successful responses contribute their latency. Non-2xx responses count
    /// as errors. Transport failures are retried and, once retries run out,
    /// count as errors with the elapsed time recorded as latency.
    pub async fn test_api(&self, provider: &str, method: Method, url: &str) -> Result<ScrapedMetrics> {
        let started = Instant::now();
        let mut latencies = Vec::with_capacity(self.samples as usize);
        let mut errors = 0u32;

        for sample in 0..self.samples {
            let user_agent = USER_AGENTS[sample as usize % USER_AGENTS.len()];
            let sample_start = Instant::now();
            let mut attempt = 0;

            loop {
                let result = self
                    .client
                    .request(method.clone(), url)
                    .header(reqwest::header::USER_AGENT, user_agent)
                    .send()
                    .await;

                match result {
                    Ok(response) => {
                        let elapsed = sample_start.elapsed().as_secs_f64() * 1000.0;
                        if response.status().is_success() {
                            latencies.push(elapsed);
                        } else {
                            debug!(provider = provider, status = %response.status(), "API test returned error status");
                            errors += 1;
                        }
                        break;
                    }
                    Err(e) if attempt < self.max_retries => {
                        attempt += 1;
                        debug!(provider = provider, attempt = attempt, error = %e, "Retrying API test request");
                    }
                    Err(e) => {
                        warn!(provider = provider, error = %e, "API test request failed");
                        errors += 1;
                        latencies.push(sample_start.elapsed().as_secs_f64() * 1000.0);
                        break;
                    }
                }
            }

            tokio::time::sleep(self.pause).await;
        }

        let Some(latency) = summarize_latencies(&latencies) else {
            anyhow::bail!("No API test sample for {} succeeded", provider);
        };

        Ok(ScrapedMetrics {
            provider: provider.to_string(),
            source: MetricSource::ApiTest,
            timestamp: Utc::now(),
            metrics: ObservedMetrics {
                latency: Some(latency),
                error_rate: Some(errors as f64 / self.samples as f64 * 100.0),
                ..Default::default()
            },
            metadata: ScrapeMetadata {
                endpoint: Some(url.to_string()),
                test_duration: Some(started.elapsed().as_millis() as u64),
                sample_size: Some(self.samples),
            },
        })
    }

    /// Every source that answered for one provider
    pub async fn collect_provider(&self, endpoints: &ProviderEndpoints) -> Vec<ScrapedMetrics> {
        let provider = endpoints.provider.as_str();
        let mut results = Vec::new();

        if let Some(url) = &endpoints.documentation {
            match self.scrape_documentation(provider, url).await {
                Ok(metrics) => results.push(metrics),
                Err(e) => warn!(provider = provider, error = %e, "Documentation scrape failed"),
            }
        }
        if let Some(url) = &endpoints.api {
            match self.test_api(provider, endpoints.api_method.clone(), url).await {
                Ok(metrics) => results.push(metrics),
                Err(e) => warn!(provider = provider, error = %e, "API test failed"),
            }
        }
        if let Some(url) = &endpoints.status_page {
            match self.scrape_status_page(provider, url).await {
                Ok(metrics) => results.push(metrics),
                Err(e) => warn!(provider = provider, error = %e, "Status page scrape failed"),
            }
        }

        results
    }

    pub async fn collect_all(&self, endpoints: &[ProviderEndpoints]) -> BTreeMap<String, Vec<ScrapedMetrics>> {
        let mut collected = BTreeMap::new();
        for endpoint in endpoints {
            let metrics = self.collect_provider(endpoint).await;
            info!(
                provider = %endpoint.provider,
                sources = metrics.len(),
                "Collected provider metrics"
            );
            collected.insert(endpoint.provider.clone(), metrics);
        }
        collected
    }
}
