//! Identify REST API Route
//!
//! The single resolution endpoint: a contact fragment goes in, the
//! consolidated identity of the person it belongs to comes out.

use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    types::{IdentifyRequest, IdentifyResponse, PhoneNumberInput},
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /identify - Resolve a contact fragment
#[utoipa::path(
    post,
    path = "/identify",
    tag = "Identify",
    request_body = IdentifyRequest,
    responses(
        (status = 200, description = "Consolidated identity", body = IdentifyResponse),
        (status = 400, description = "Both identifiers absent", body = ApiError),
        (status = 500, description = "Store failure", body = ApiError),
    )
)]
pub async fn identify(
    State(state): State<AppState>,
    Json(request): Json<IdentifyRequest>,
) -> ApiResult<impl IntoResponse> {
    let phone = request.phone_number.map(PhoneNumberInput::into_string);
    let identity = state
        .resolver
        .resolve(request.email.as_deref(), phone.as_deref())
        .await?;
    Ok(Json(IdentifyResponse::from(identity)))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the identify routes router.
pub fn create_router() -> axum::Router<AppState> {
    axum::Router::new().route("/", axum::routing::post(identify))
}
