//! OpenAPI documentation configuration for the management API.

use utoipa::OpenApi;

use crate::api::handlers;
use crate::api::models::events::{EventResponse, EventUpsert};
use crate::api::models::sponsors::{SponsorResponse, SponsorUpsert};
use crate::api::models::uploads::UploadResponse;
use crate::db::models::events::EventStatus;

/// OpenAPI document for the management API at `/admin/api/v1/*`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "hubctl Admin API",
        description = "Administrative backend for the community hub: events, sponsors, and media uploads."
    ),
    servers((url = "/admin/api/v1", description = "Management API")),
    paths(
        handlers::events::list_events,
        handlers::events::create_event,
        handlers::events::get_event,
        handlers::events::replace_event,
        handlers::events::delete_event,
        handlers::sponsors::list_sponsors,
        handlers::sponsors::create_sponsor,
        handlers::sponsors::get_sponsor,
        handlers::sponsors::replace_sponsor,
        handlers::sponsors::delete_sponsor,
        handlers::uploads::create_upload,
    ),
    components(schemas(
        EventUpsert,
        EventResponse,
        EventStatus,
        SponsorUpsert,
        SponsorResponse,
        UploadResponse,
    )),
    tags(
        (name = "events", description = "Event management"),
        (name = "sponsors", description = "Sponsor management"),
        (name = "uploads", description = "Media upload bridging"),
    )
)]
pub struct ApiDoc;
