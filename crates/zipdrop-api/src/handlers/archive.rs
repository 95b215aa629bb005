use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Extension, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use zipdrop_core::constants::ZIP_CONTENT_TYPE;
use zipdrop_core::models::{ArchiveRequest, CreateZipRequest, CreateZipResponse};
use zipdrop_core::AppError;
use zipdrop_infra::{ErrorResponse, RequestId};
use zipdrop_services::Delivery;

#[utoipa::path(
    post,
    path = "/create-zip",
    tag = "archive",
    request_body = CreateZipRequest,
    responses(
        (status = 200, description = "Download link for the relayed archive. When the relay is unavailable the archive itself is returned as application/zip.", body = CreateZipResponse),
        (status = 400, description = "Missing or malformed 'files' array", body = ErrorResponse),
        (status = 500, description = "Archive could not be created", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request_id, body),
    fields(
        request_id = %request_id.0,
        files_count = tracing::field::Empty,
        archive_name = tracing::field::Empty
    )
)]
pub async fn create_zip(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    ValidatedJson(body): ValidatedJson<CreateZipRequest>,
) -> Result<Response, HttpAppError> {
    let request = ArchiveRequest::try_from(body)?;

    let span = tracing::Span::current();
    span.record("files_count", request.files_count());
    span.record("archive_name", request.archive_name.as_str());
    tracing::info!(apartment_id = %request.apartment_id, "Creating archive");

    match state.workflow.run(&request).await? {
        Delivery::Hosted(response) => Ok(Json(response).into_response()),
        Delivery::Inline {
            archive_name,
            bytes,
        } => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, ZIP_CONTENT_TYPE)
            .header(
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", header_safe(&archive_name)),
            )
            .body(Body::from(bytes))
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to build response");
                AppError::Internal(e.to_string()).into()
            }),
    }
}

/// Quotes and control characters cannot appear inside the quoted filename parameter.
fn header_safe(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect()
}
