use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::api::types::*;
use crate::error::SymdexError;
use crate::models::{LookupMode, SearchHit, SearchResponse};

use super::router::AppState;

/// Error wrapper for API handlers
pub enum ApiError {
    Symdex(SymdexError),
}

impl From<SymdexError> for ApiError {
    fn from(e: SymdexError) -> Self {
        ApiError::Symdex(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::Symdex(e) => {
                let (status, error_type) = match &e {
                    SymdexError::MalformedIndex { .. } => (StatusCode::BAD_REQUEST, "malformed_index"),
                    SymdexError::Syntax { .. } => (StatusCode::BAD_REQUEST, "syntax_error"),
                    SymdexError::UnknownFormat(_) => (StatusCode::BAD_REQUEST, "unknown_format"),
                    SymdexError::Json(_) => (StatusCode::BAD_REQUEST, "serialization_error"),
                    SymdexError::Config(_) => (StatusCode::CONFLICT, "config_error"),
                    SymdexError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
                    SymdexError::Internal(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
                    }
                };
                (status, error_type, e.to_string())
            }
        };

        let error_response = ErrorResponse::new(error_type, message);
        (status, Json(error_response)).into_response()
    }
}

/// Prefix search over keys
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let start = Instant::now();
    let index = state.handle.current();
    let limit = state.settings.effective_limit(params.limit);

    let (entries, total_hits) = index.lookup_limited(&params.q, limit);
    let results: Vec<SearchHit> = entries.into_iter().map(SearchHit::from).collect();

    let elapsed = start.elapsed();
    state
        .metrics
        .record_lookup(LookupMode::Prefix, results.len(), elapsed.as_secs_f64());
    debug!(query = %params.q, returned = results.len(), total_hits, "prefix lookup");

    Json(SearchResponse {
        mode: LookupMode::Prefix,
        query: params.q,
        results,
        took_ms: elapsed.as_millis() as u64,
        total_hits,
    })
}

/// Entries whose key equals the path segment
pub async fn exact_match(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Query(params): Query<ExactParams>,
) -> Json<SearchResponse> {
    let start = Instant::now();
    let index = state.handle.current();
    let limit = state.settings.effective_limit(params.limit);

    let entries = index.exact_match(&key);
    let total_hits = entries.len();
    let results: Vec<SearchHit> = entries.into_iter().take(limit).map(SearchHit::from).collect();

    let elapsed = start.elapsed();
    state
        .metrics
        .record_lookup(LookupMode::Exact, results.len(), elapsed.as_secs_f64());
    debug!(key = %key, returned = results.len(), total_hits, "exact lookup");

    Json(SearchResponse {
        mode: LookupMode::Exact,
        query: key,
        results,
        took_ms: elapsed.as_millis() as u64,
        total_hits,
    })
}

/// Re-read the table source and swap in the new index
pub async fn reload(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let start = Instant::now();
    let handle = state.handle.clone();

    let result = tokio::task::spawn_blocking(move || handle.reload())
        .await
        .map_err(|e| SymdexError::Internal(format!("reload task failed: {}", e)))?;

    state.metrics.record_reload(result.is_ok());
    let (index, generation) = result?;
    state.metrics.set_index(&index, generation);

    Ok(Json(ReloadResponse {
        generation,
        entries: index.len(),
        keys: index.key_count(),
        took_ms: start.elapsed().as_millis() as u64,
    }))
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: crate::VERSION.to_string(),
        entries: state.handle.current().len(),
        generation: state.handle.generation(),
    })
}

/// Prometheus metrics endpoint
pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = state.metrics.registry().gather();
    let mut buffer = vec![];
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| SymdexError::Internal(format!("metrics encoding failed: {}", e)))?;

    Ok((
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4",
        )],
        buffer,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexSettings;
    use crate::format::TableFormat;
    use crate::index::{IndexHandle, SymbolIndex, TableSource};
    use crate::metrics::SearchMetrics;
    use tempfile::TempDir;

    const TABLE: &str = "var searchData=\n[\
        ['take_5fall_0',['take_all',['opt.html#a1',1,'CLI::OptionBase']]],\
        ['type_5fsize_1',['type_size',['opt.html#a2',1,'CLI::Option::type_size(int)'],['opt.html#a3',1,'CLI::Option::type_size(int, int)']]],\
        ['type_5fname_2',['type_name',['opt.html#a4',1,'CLI::Option']]]\
        ];";

    fn state_from(handle: IndexHandle) -> Arc<AppState> {
        Arc::new(AppState::new(
            Arc::new(handle),
            Arc::new(SearchMetrics::new().unwrap()),
            IndexSettings::default(),
        ))
    }

    fn state() -> Arc<AppState> {
        state_from(IndexHandle::new(
            SymbolIndex::load(TABLE, TableFormat::Doxygen).unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_search_handler() {
        let state = state();
        let params = SearchParams {
            q: "TYPE_".to_string(),
            limit: None,
        };

        let Json(response) = search(State(state.clone()), Query(params)).await;
        assert_eq!(response.total_hits, 2);
        let keys: Vec<&str> = response.results.iter().map(|h| h.key.as_str()).collect();
        assert_eq!(keys, vec!["type_name", "type_size"]);
        assert_eq!(response.results[1].targets.len(), 2);
        assert_eq!(response.results[1].targets[0].url, "opt.html#a2");

        assert_eq!(
            state.metrics.lookups_total.with_label_values(&["prefix"]).get(),
            1.0
        );
    }

    #[tokio::test]
    async fn test_search_handler_limit() {
        let state = state();
        let params = SearchParams {
            q: String::new(),
            limit: Some(1),
        };

        let Json(response) = search(State(state), Query(params)).await;
        assert_eq!(response.total_hits, 3);
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].key, "take_all");
    }

    #[tokio::test]
    async fn test_exact_match_handler() {
        let state = state();

        let Json(response) = exact_match(
            State(state.clone()),
            Path("type_size".to_string()),
            Query(ExactParams::default()),
        )
        .await;
        assert_eq!(response.mode, LookupMode::Exact);
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].targets.len(), 2);

        let Json(response) = exact_match(
            State(state),
            Path("zzz".to_string()),
            Query(ExactParams::default()),
        )
        .await;
        assert!(response.results.is_empty());
    }

    #[tokio::test]
    async fn test_reload_without_source_is_conflict() {
        let state = state();
        let response = reload(State(state.clone())).await.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            state.metrics.reloads_total.with_label_values(&["failure"]).get(),
            1
        );
    }

    #[tokio::test]
    async fn test_reload_swaps_index() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("all_0.js");
        std::fs::write(&path, TABLE).unwrap();

        let handle = IndexHandle::open(TableSource::file(&path, TableFormat::Auto)).unwrap();
        let state = state_from(handle);

        std::fs::write(&path, "var searchData=[['zeta_0',['zeta',['z.html#z',1,'Z']]]];").unwrap();
        let response = reload(State(state.clone())).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let Json(found) = search(
            State(state.clone()),
            Query(SearchParams {
                q: "ze".to_string(),
                limit: None,
            }),
        )
        .await;
        assert_eq!(found.results.len(), 1);
        assert_eq!(state.metrics.index_entries.get(), 1.0);
        assert_eq!(state.metrics.index_generation.get(), 2.0);

        std::fs::write(&path, "var searchData=[['bad_0',['bad']]];").unwrap();
        let response = reload(State(state.clone())).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.handle.current().len(), 1);
    }

    #[tokio::test]
    async fn test_health_and_metrics() {
        let state = state();
        let response = health_check(State(state.clone())).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response = metrics(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
