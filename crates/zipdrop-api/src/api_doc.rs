//! OpenAPI documentation, served at `/openapi.json`.

use utoipa::OpenApi;

use crate::handlers;
use zipdrop_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ZIP Archive Service",
        description = "Downloads a list of remote files, bundles them into a ZIP archive and returns either a temporary download link or the archive itself."
    ),
    paths(
        handlers::health::health_check,
        handlers::archive::create_zip,
    ),
    components(
        schemas(
            models::HealthResponse,
            models::CreateZipRequest,
            models::CreateZipResponse,
            zipdrop_infra::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "archive", description = "Archive creation")
    )
)]
pub struct ApiDoc;
