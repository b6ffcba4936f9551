use axum::{extract::State, Json};
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::metrics;
use crate::optimizer::{evaluate_combinations, BudgetInput, Combination};
use crate::server::AppState;

/// Handle /v1/calculate endpoint
///
/// The body is parsed by hand so malformed requests get the same error
/// shape as failed validation.
pub async fn calculate(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<Vec<Combination>>, AppError> {
    let input = BudgetInput::from_json(&body).map_err(|e| {
        metrics::record_invalid_request();
        warn!(error = %e, "Rejected planning request");
        AppError::from(e)
    })?;

    let catalog = state.catalog.load();
    let started = Instant::now();
    let calculation = evaluate_combinations(&catalog, &input)?;
    let elapsed = started.elapsed();

    metrics::record_calculation(
        input.use_voice_agent,
        calculation.evaluated,
        calculation.combinations.len(),
        elapsed,
    );
    debug!(
        feasible = calculation.combinations.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "Planning request served"
    );

    Ok(Json(calculation.combinations))
}
