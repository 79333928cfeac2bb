use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::IndexSettings;
use crate::index::IndexHandle;
use crate::metrics::SearchMetrics;

use super::handlers::*;

/// Application state shared across all handlers
pub struct AppState {
    pub handle: Arc<IndexHandle>,
    pub metrics: Arc<SearchMetrics>,
    pub settings: IndexSettings,
}

impl AppState {
    pub fn new(
        handle: Arc<IndexHandle>,
        metrics: Arc<SearchMetrics>,
        settings: IndexSettings,
    ) -> Self {
        metrics.set_index(&handle.current(), handle.generation());
        Self {
            handle,
            metrics,
            settings,
        }
    }
}

/// Create the HTTP router with all endpoints
pub fn create_router(state: AppState, permissive_cors: bool) -> Router {
    let state = Arc::new(state);

    let router = Router::new()
        // Lookups
        .route("/v1/search", get(search))
        .route("/v1/symbols/:key", get(exact_match))
        // Index management
        .route("/v1/admin/reload", post(reload))
        // Health and metrics
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if permissive_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
