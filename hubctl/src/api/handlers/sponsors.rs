//! HTTP handlers for sponsor management endpoints.
//!
//! Sponsor creation is the multipart flow: scalar fields arrive as form
//! parts alongside an optional `logo` file, which is bridged to the media
//! host before the insert. Replacement is plain JSON referencing an
//! already-bridged logo URL.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::{
    AppState,
    api::models::{
        ListQuery,
        search::filter_by_search,
        sponsors::{SponsorResponse, SponsorUpsert},
        uploads::{resolve_content_type, validate_payload},
    },
    db::handlers::{Repository, Sponsors},
    errors::{Error, Result},
    media::UploadPayload,
    types::SponsorId,
};

/// List all sponsors, optionally filtered by a search term.
#[utoipa::path(
    get,
    path = "/sponsors",
    tag = "sponsors",
    summary = "List sponsors",
    description = "List all sponsors, newest first. The optional search term filters by name or description, case-insensitively.",
    params(ListQuery),
    responses(
        (status = 200, description = "List of sponsors", body = [SponsorResponse]),
        (status = 500, description = "Internal server error"),
    )
)]
#[instrument(skip_all)]
pub async fn list_sponsors(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Result<Json<Vec<SponsorResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Sponsors::new(&mut conn);

    let sponsors = repo.list().await?;
    let responses: Vec<SponsorResponse> = sponsors.into_iter().map(Into::into).collect();

    Ok(Json(filter_by_search(responses, query.search.as_deref())))
}

/// Create a sponsor from a multipart form, bridging the logo if present.
#[utoipa::path(
    post,
    path = "/sponsors",
    tag = "sponsors",
    summary = "Create sponsor",
    description = "Create a sponsor from multipart form data. An optional `logo` file part is uploaded to the media host and stored as the sponsor's logo URL.",
    request_body(content_type = "multipart/form-data", description = "Sponsor fields plus an optional logo file"),
    responses(
        (status = 201, description = "Sponsor created", body = SponsorResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "A sponsor with this name already exists"),
        (status = 413, description = "Logo exceeds the size ceiling"),
        (status = 415, description = "Logo content type not accepted"),
        (status = 502, description = "Media host rejected the upload"),
        (status = 500, description = "Internal server error"),
    )
)]
#[instrument(skip_all)]
pub async fn create_sponsor(State(state): State<AppState>, mut multipart: Multipart) -> Result<(StatusCode, Json<SponsorResponse>)> {
    let mut request = SponsorUpsert::default();
    let mut logo: Option<UploadPayload> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| Error::BadRequest {
        message: format!("Failed to parse multipart data: {e}"),
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        let text = |e| Error::BadRequest {
            message: format!("Failed to read field: {e}"),
        };

        match field_name.as_str() {
            "name" => request.name = field.text().await.map_err(text)?,
            "description" => request.description = Some(field.text().await.map_err(text)?).filter(|s| !s.is_empty()),
            "website_url" => request.website_url = Some(field.text().await.map_err(text)?).filter(|s| !s.is_empty()),
            "contact_name" => request.contact_name = Some(field.text().await.map_err(text)?).filter(|s| !s.is_empty()),
            "contact_email" => request.contact_email = Some(field.text().await.map_err(text)?).filter(|s| !s.is_empty()),
            "logo" => {
                let filename = field.file_name().map(|s| s.to_string());
                let declared = field.content_type().map(|s| s.to_string());
                // Fully buffered before transmission, per the bridge contract
                let bytes = field.bytes().await.map_err(|e| Error::BadRequest {
                    message: format!("Failed to read logo file: {e}"),
                })?;
                let content_type = resolve_content_type(declared, filename.as_deref());
                logo = Some(UploadPayload {
                    bytes,
                    content_type,
                    filename,
                });
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    request.validate()?;

    if let Some(payload) = logo {
        validate_payload(&payload, &state.config.uploads)?;
        let reference = state.media.store(payload, &state.config.uploads.sponsor_logo_category).await?;
        request.logo_url = Some(reference.to_string());
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Sponsors::new(&mut conn);

    let sponsor = repo.create(&request.into()).await?;

    Ok((StatusCode::CREATED, Json(sponsor.into())))
}

/// Get a single sponsor.
#[utoipa::path(
    get,
    path = "/sponsors/{id}",
    tag = "sponsors",
    summary = "Get sponsor",
    params(("id" = uuid::Uuid, Path, description = "Sponsor ID")),
    responses(
        (status = 200, description = "The sponsor", body = SponsorResponse),
        (status = 404, description = "Sponsor not found"),
        (status = 500, description = "Internal server error"),
    )
)]
#[instrument(skip_all)]
pub async fn get_sponsor(State(state): State<AppState>, Path(id): Path<SponsorId>) -> Result<Json<SponsorResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Sponsors::new(&mut conn);

    let sponsor = repo.get_by_id(id).await?.ok_or_else(|| Error::NotFound {
        resource: "Sponsor".to_string(),
        id: id.to_string(),
    })?;

    Ok(Json(sponsor.into()))
}

/// Replace a sponsor wholesale.
#[utoipa::path(
    put,
    path = "/sponsors/{id}",
    tag = "sponsors",
    summary = "Replace sponsor",
    description = "Whole-record replacement; there are no partial-update semantics.",
    params(("id" = uuid::Uuid, Path, description = "Sponsor ID")),
    request_body = SponsorUpsert,
    responses(
        (status = 200, description = "Sponsor replaced", body = SponsorResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Sponsor not found"),
        (status = 409, description = "A sponsor with this name already exists"),
        (status = 500, description = "Internal server error"),
    )
)]
#[instrument(skip_all)]
pub async fn replace_sponsor(
    State(state): State<AppState>,
    Path(id): Path<SponsorId>,
    Json(request): Json<SponsorUpsert>,
) -> Result<Json<SponsorResponse>> {
    request.validate()?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Sponsors::new(&mut conn);

    let sponsor = repo.update(id, &request.into()).await?.ok_or_else(|| Error::NotFound {
        resource: "Sponsor".to_string(),
        id: id.to_string(),
    })?;

    Ok(Json(sponsor.into()))
}

/// Delete a sponsor.
#[utoipa::path(
    delete,
    path = "/sponsors/{id}",
    tag = "sponsors",
    summary = "Delete sponsor",
    params(("id" = uuid::Uuid, Path, description = "Sponsor ID")),
    responses(
        (status = 204, description = "Sponsor deleted"),
        (status = 404, description = "Sponsor not found"),
        (status = 500, description = "Internal server error"),
    )
)]
#[instrument(skip_all)]
pub async fn delete_sponsor(State(state): State<AppState>, Path(id): Path<SponsorId>) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Sponsors::new(&mut conn);

    if !repo.delete(id).await? {
        return Err(Error::NotFound {
            resource: "Sponsor".to_string(),
            id: id.to_string(),
        });
    }

    Ok(StatusCode::NO_CONTENT)
}
