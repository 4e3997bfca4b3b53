use axum::http::HeaderValue;
use axum::middleware;
use axum::routing::{delete, get};
use axum::{Json, Router};
use sea_orm::DatabaseConnection;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

use common::types::Health;

use crate::rate_limit::{self, RateLimiter};

pub mod records;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

pub async fn health() -> Json<Health> {
    Json(Health::running("income records API is healthy"))
}

/// Build the CORS layer from the configured origin allow-list.
pub fn build_cors(cfg: &configs::CorsConfig) -> CorsLayer {
    if cfg.allows_any() {
        return CorsLayer::very_permissive();
    }
    let origins: Vec<HeaderValue> = cfg
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the full application router: public health probe plus the
/// rate-limited record API.
pub fn build_router(state: AppState, cors: CorsLayer, limiter: RateLimiter) -> Router {
    let api = Router::new()
        .route("/api/records", get(records::list).post(records::create))
        .route("/api/records/stats", get(records::stats))
        .route("/api/records/:id", delete(records::remove))
        .route_layer(middleware::from_fn_with_state(limiter, rate_limit::enforce));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
