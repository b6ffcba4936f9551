use axum::{extract::State, Json};

use crate::catalog::Catalog;
use crate::server::AppState;

/// Handle /v1/catalog endpoint: the catalog and economics currently in effect
pub async fn get_catalog(State(state): State<AppState>) -> Json<Catalog> {
    Json(Catalog::clone(&state.catalog.load()))
}
