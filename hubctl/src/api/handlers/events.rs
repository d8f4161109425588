//! HTTP handlers for event management endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::{
    AppState,
    api::models::{
        ListQuery,
        events::{EventResponse, EventUpsert},
        search::filter_by_search,
    },
    db::handlers::{Events, Repository},
    errors::{Error, Result},
    types::EventId,
};

/// List all events, optionally filtered by a search term.
#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    summary = "List events",
    description = "List all events, newest first. The optional search term filters by title or description, case-insensitively.",
    params(ListQuery),
    responses(
        (status = 200, description = "List of events", body = [EventResponse]),
        (status = 500, description = "Internal server error"),
    )
)]
#[instrument(skip_all)]
pub async fn list_events(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Result<Json<Vec<EventResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Events::new(&mut conn);

    let events = repo.list().await?;
    let responses: Vec<EventResponse> = events.into_iter().map(Into::into).collect();

    Ok(Json(filter_by_search(responses, query.search.as_deref())))
}

/// Create a new event.
#[utoipa::path(
    post,
    path = "/events",
    tag = "events",
    summary = "Create event",
    request_body = EventUpsert,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Internal server error"),
    )
)]
#[instrument(skip_all)]
pub async fn create_event(State(state): State<AppState>, Json(request): Json<EventUpsert>) -> Result<(StatusCode, Json<EventResponse>)> {
    request.validate()?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Events::new(&mut conn);

    let event = repo.create(&request.into()).await?;

    Ok((StatusCode::CREATED, Json(event.into())))
}

/// Get a single event.
#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "events",
    summary = "Get event",
    params(("id" = uuid::Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "The event", body = EventResponse),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error"),
    )
)]
#[instrument(skip_all)]
pub async fn get_event(State(state): State<AppState>, Path(id): Path<EventId>) -> Result<Json<EventResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Events::new(&mut conn);

    let event = repo.get_by_id(id).await?.ok_or_else(|| Error::NotFound {
        resource: "Event".to_string(),
        id: id.to_string(),
    })?;

    Ok(Json(event.into()))
}

/// Replace an event wholesale.
#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "events",
    summary = "Replace event",
    description = "Whole-record replacement; there are no partial-update semantics.",
    params(("id" = uuid::Uuid, Path, description = "Event ID")),
    request_body = EventUpsert,
    responses(
        (status = 200, description = "Event replaced", body = EventResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error"),
    )
)]
#[instrument(skip_all)]
pub async fn replace_event(
    State(state): State<AppState>,
    Path(id): Path<EventId>,
    Json(request): Json<EventUpsert>,
) -> Result<Json<EventResponse>> {
    request.validate()?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Events::new(&mut conn);

    let event = repo.update(id, &request.into()).await?.ok_or_else(|| Error::NotFound {
        resource: "Event".to_string(),
        id: id.to_string(),
    })?;

    Ok(Json(event.into()))
}

/// Delete an event.
#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "events",
    summary = "Delete event",
    params(("id" = uuid::Uuid, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error"),
    )
)]
#[instrument(skip_all)]
pub async fn delete_event(State(state): State<AppState>, Path(id): Path<EventId>) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Events::new(&mut conn);

    if !repo.delete(id).await? {
        return Err(Error::NotFound {
            resource: "Event".to_string(),
            id: id.to_string(),
        });
    }

    Ok(StatusCode::NO_CONTENT)
}
