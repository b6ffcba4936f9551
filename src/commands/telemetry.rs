use anyhow::Result;
use avatar_planner::telemetry::{self, known_endpoints, MetricsStore, ProviderMetrics};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use std::collections::BTreeMap;
use std::path::Path;

/// Execute the telemetry collect command
pub async fn collect(config_path: &Path) -> Result<()> {
    let (cfg, _) = super::load_planner(config_path)?;
    let endpoints = known_endpoints();

    println!(
        "{}",
        format!("Collecting metrics from {} providers...", endpoints.len()).yellow()
    );

    let stored = telemetry::run_collection(&cfg.telemetry, &endpoints).await?;

    if stored == 0 {
        println!("{}", "✗ No provider returned usable metrics".red());
    } else {
        println!(
            "{}",
            format!(
                "✓ Stored metrics for {} provider(s) in {}",
                stored,
                cfg.telemetry.store_path.display()
            )
            .green()
        );
    }

    Ok(())
}

/// Execute the telemetry show command
pub fn show(config_path: &Path) -> Result<()> {
    let (cfg, _) = super::load_planner(config_path)?;
    let store = MetricsStore::new(&cfg.telemetry.store_path, cfg.telemetry.history_batches);

    let metrics = telemetry::provider_metrics(&store);
    println!("{}", metrics_table(&metrics));

    if metrics.values().all(|m| m.aggregated.is_none()) {
        println!(
            "{}",
            "No collected metrics yet. Run 'avatar-planner telemetry collect'.".yellow()
        );
    }

    Ok(())
}

fn optional(value: Option<f64>, suffix: &str) -> String {
    value
        .map(|v| format!("{:.1}{}", v, suffix))
        .unwrap_or_else(|| "-".to_string())
}

fn metrics_table(metrics: &BTreeMap<String, ProviderMetrics>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("PROVIDER").fg(Color::Cyan),
        Cell::new("DEFAULT MS").fg(Color::Cyan),
        Cell::new("AVG MS").fg(Color::Cyan),
        Cell::new("P95 MS").fg(Color::Cyan),
        Cell::new("P99 MS").fg(Color::Cyan),
        Cell::new("ERROR RATE").fg(Color::Cyan),
        Cell::new("UPTIME").fg(Color::Cyan),
        Cell::new("SAMPLES").fg(Color::Cyan),
    ]);

    for (provider, entry) in metrics {
        let aggregated = entry.aggregated.as_ref();
        let latency = aggregated.and_then(|a| a.latency.as_ref());

        table.add_row(vec![
            Cell::new(provider),
            Cell::new(
                entry
                    .default_latency_ms
                    .map(|ms| ms.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(optional(latency.map(|l| l.average), "")),
            Cell::new(optional(latency.map(|l| l.p95), "")),
            Cell::new(optional(latency.map(|l| l.p99), "")),
            Cell::new(optional(
                aggregated.and_then(|a| a.error_rate.as_ref()).map(|r| r.average),
                "%",
            )),
            Cell::new(optional(
                aggregated.and_then(|a| a.uptime.as_ref()).map(|r| r.average),
                "%",
            )),
            Cell::new(latency.map(|l| l.sample_size).unwrap_or(0)),
        ]);
    }

    table
}
