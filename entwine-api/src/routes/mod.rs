//! REST API Routes Module
//!
//! Route handlers and router assembly:
//! - POST /identify - the resolution endpoint
//! - Health check endpoints (Kubernetes-compatible)
//! - /openapi.json (behind the `openapi` feature)
//! - CORS, request tracing, and body-size limiting for all routes

pub mod health;
pub mod identify;

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::state::AppState;

// Re-export route creation functions for convenience
pub use health::create_router as health_router;
pub use identify::create_router as identify_router;

// ============================================================================
// OPENAPI ENDPOINT
// ============================================================================

/// Handler for /openapi.json endpoint.
#[cfg(feature = "openapi")]
async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi;
    axum::Json(crate::openapi::ApiDoc::openapi())
}

// ============================================================================
// CORS
// ============================================================================

fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = if config.cors_origins.is_empty() {
        // Dev mode: allow all origins
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    };

    cors.allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(config.cors_max_age_secs))
}

// ============================================================================
// ROUTER ASSEMBLY
// ============================================================================

/// Create the full API router with CORS, tracing, and body limits applied.
pub fn create_api_router(state: AppState, config: &ApiConfig) -> Router {
    let router = Router::new()
        .nest("/identify", identify::create_router())
        .nest("/health", health::create_router());

    #[cfg(feature = "openapi")]
    let router = router.route("/openapi.json", axum::routing::get(openapi_json));

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/docs")
            .url("/docs/openapi.json", <crate::openapi::ApiDoc as utoipa::OpenApi>::openapi()),
    );

    router
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
        .layer(build_cors_layer(config))
        .with_state(state)
}
