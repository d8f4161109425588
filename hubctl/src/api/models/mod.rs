//! API request and response data models.
//!
//! These structures define the public API contract and are distinct from the
//! database models, which lets the storage representation evolve
//! independently. All models carry `utoipa` annotations for the generated
//! API documentation. Validation happens at this boundary: handlers call the
//! DTOs' `validate` methods before touching the media bridge or the database.

use serde::Deserialize;
use utoipa::IntoParams;

pub mod events;
pub mod search;
pub mod sponsors;
pub mod uploads;

/// Query parameters shared by the list endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Case-insensitive substring filter over title/name and description
    pub search: Option<String>,
}
