use anyhow::Result;
use arc_swap::ArcSwap;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    catalog::Catalog, config::Config, handlers, metrics, signals::setup_signal_handlers,
    telemetry::MetricsStore,
};

/// State shared by the API handlers
#[derive(Clone)]
pub struct AppState {
    /// Swapped atomically on SIGHUP
    pub catalog: Arc<ArcSwap<Catalog>>,
    pub metrics_store: MetricsStore,
}

impl AppState {
    pub fn new(catalog: Catalog, metrics_store: MetricsStore) -> Self {
        Self {
            catalog: Arc::new(ArcSwap::from_pointee(catalog)),
            metrics_store,
        }
    }
}

/// Start the planner HTTP server
///
/// Blocks until SIGTERM or SIGINT. SIGHUP reloads the catalog from
/// the configuration file at `config_path`.
pub async fn start_server(config: Config, config_path: PathBuf, catalog: Catalog) -> Result<()> {
    info!("Initializing Prometheus metrics...");
    let metrics_handle = Arc::new(metrics::init_metrics());

    let metrics_store = MetricsStore::new(&config.telemetry.store_path, config.telemetry.history_batches);
    let state = AppState::new(catalog, metrics_store);

    let (shutdown_tx, signal_handle) = setup_signal_handlers(config_path, state.catalog.clone());
    let mut shutdown_rx = shutdown_tx.subscribe();

    let app = create_router(state.clone(), metrics_handle);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    let catalog = state.catalog.load();
    info!("Starting avatar planner on {}", addr);
    info!(
        "Catalog: {} avatar plans, {} voice agents, {} hosting options",
        catalog.avatar_plans.len(),
        catalog.voice_agents.len(),
        catalog.hosting_options.len()
    );
    drop(catalog);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    signal_handle.await?;
    info!("Server stopped gracefully");

    Ok(())
}

/// Create the Axum router with all routes and middleware
pub fn create_router(state: AppState, metrics_handle: Arc<PrometheusHandle>) -> Router {
    let api_routes = Router::new()
        .route("/v1/calculate", post(handlers::calculate::calculate))
        .route("/v1/catalog", get(handlers::catalog::get_catalog))
        .route(
            "/v1/metrics/providers",
            get(handlers::telemetry::provider_metrics_handler),
        )
        .with_state(state);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics_handler::metrics))
        .with_state(metrics_handle)
        .merge(api_routes)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(TraceLayer::new_for_http())
}
