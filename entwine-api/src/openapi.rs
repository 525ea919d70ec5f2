//! OpenAPI documentation for the Entwine API.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes;
use crate::types;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Entwine API",
        description = "Identity resolution over contact fragments: submit an \
                       email and/or phone number, get back the consolidated \
                       identity of the person they belong to."
    ),
    paths(
        routes::identify::identify,
        routes::health::ping,
        routes::health::liveness,
        routes::health::readiness,
    ),
    components(schemas(
        types::IdentifyRequest,
        types::IdentifyResponse,
        types::ContactView,
        ApiError,
        ErrorCode,
        routes::health::HealthResponse,
        routes::health::HealthStatus,
        routes::health::HealthDetails,
        routes::health::ComponentHealth,
    )),
    tags(
        (name = "Identify", description = "Identity resolution"),
        (name = "Health", description = "Health checks"),
    )
)]
pub struct ApiDoc;
