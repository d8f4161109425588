//! HTTP handler for the media upload endpoint.
//!
//! This is the direct exposure of the upload bridge: the admin frontend
//! posts a file plus a destination category and gets back the durable
//! reference to embed in a later create/replace request.

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::{
    AppState,
    api::models::uploads::{UploadResponse, resolve_content_type, validate_payload},
    config::validate_category,
    errors::{Error, Result},
    media::UploadPayload,
};

/// Bridge one uploaded file to the media host.
#[utoipa::path(
    post,
    path = "/uploads",
    tag = "uploads",
    summary = "Upload a file",
    description = "Upload a file to the media host under a destination category and return its durable URL. The payload is buffered fully, transmitted exactly once, and never deduplicated: repeating an upload stores a new object.",
    request_body(content_type = "multipart/form-data", description = "A `file` part plus a `category` field"),
    responses(
        (status = 201, description = "File stored", body = UploadResponse),
        (status = 400, description = "Invalid request"),
        (status = 413, description = "File exceeds the size ceiling"),
        (status = 415, description = "Content type not accepted"),
        (status = 502, description = "Media host rejected the upload"),
        (status = 500, description = "Internal server error"),
    )
)]
#[instrument(skip_all)]
pub async fn create_upload(State(state): State<AppState>, mut multipart: Multipart) -> Result<(StatusCode, Json<UploadResponse>)> {
    let mut payload: Option<UploadPayload> = None;
    let mut category: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| Error::BadRequest {
        message: format!("Failed to parse multipart data: {e}"),
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let filename = field.file_name().map(|s| s.to_string());
                let declared = field.content_type().map(|s| s.to_string());
                // Fully buffered before transmission, per the bridge contract
                let bytes = field.bytes().await.map_err(|e| Error::BadRequest {
                    message: format!("Failed to read file: {e}"),
                })?;
                let content_type = resolve_content_type(declared, filename.as_deref());
                payload = Some(UploadPayload {
                    bytes,
                    content_type,
                    filename,
                });
            }
            "category" => {
                category = Some(field.text().await.map_err(|e| Error::BadRequest {
                    message: format!("Failed to read category field: {e}"),
                })?);
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    let payload = payload.ok_or_else(|| Error::BadRequest {
        message: "missing 'file' part".to_string(),
    })?;
    let category = category.ok_or_else(|| Error::BadRequest {
        message: "missing 'category' field".to_string(),
    })?;

    validate_category(&category)?;
    validate_payload(&payload, &state.config.uploads)?;

    let reference = state.media.store(payload, &category).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            url: reference.to_string(),
        }),
    ))
}
