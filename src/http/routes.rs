//! Axum router configuration

use axum::{
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

use super::handlers::{get_transcript, health_check, version_check};
use super::middleware::request_logger;

/// Create the Axum router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors_enabled = state.config.cors_enabled;

    let router = Router::new()
        .route("/", get(get_transcript))
        // Health and version endpoints
        .route("/health", get(health_check))
        .route("/version", get(version_check))
        // Middleware
        .layer(middleware::from_fn(request_logger))
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state);

    if cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::ACCEPT, header::CONTENT_TYPE, header::ORIGIN])
            .max_age(Duration::from_secs(3600));
        router.layer(cors)
    } else {
        router
    }
}
