//! Entwine API - REST Layer for Identity Resolution
//!
//! Exposes the resolution engine over HTTP: a single `POST /identify`
//! endpoint plus health checks and OpenAPI documentation. Transport
//! concerns (JSON shape, numeric phone coercion, status-code mapping) live
//! here; the resolution semantics live in `entwine-engine`.

pub mod config;
pub mod error;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod state;
pub mod types;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::create_api_router;
pub use state::{ApiResolver, AppState};
