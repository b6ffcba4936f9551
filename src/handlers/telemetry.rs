use axum::{extract::State, Json};
use std::collections::BTreeMap;

use crate::error::AppError;
use crate::server::AppState;
use crate::telemetry::{provider_metrics, ProviderMetrics};

/// Handle /v1/metrics/providers endpoint
pub async fn provider_metrics_handler(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, ProviderMetrics>>, AppError> {
    let store = state.metrics_store.clone();
    let metrics = tokio::task::spawn_blocking(move || provider_metrics(&store))
        .await
        .map_err(|e| AppError::InternalError(format!("Metrics store task failed: {}", e)))?;

    Ok(Json(metrics))
}
