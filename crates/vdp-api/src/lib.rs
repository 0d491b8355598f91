//! VDP API /v1: REST endpoints over the profile pipeline
pub mod handlers;
pub mod metrics;
pub mod middleware;

use axum::{
    routing::{get, post},
    Router,
};
use metrics::ApiMetrics;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use vdp_pipeline::ProfilePipeline;

/// Shared, immutable across requests
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ProfilePipeline>,
    pub metrics: Arc<ApiMetrics>,
}

impl AppState {
    pub fn new(pipeline: ProfilePipeline) -> Result<Self, prometheus::Error> {
        Ok(Self { pipeline: Arc::new(pipeline), metrics: Arc::new(ApiMetrics::new()?) })
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/v1/profiles/validate", post(handlers::validate_profile))
        .route("/v1/schema", get(handlers::get_schema))
        .route("/v1/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors())
        .with_state(state)
}

pub async fn run(addr: &str, state: AppState) -> anyhow::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("VDP API listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
