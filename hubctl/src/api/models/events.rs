//! API models for community events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::models::search::Searchable;
use crate::db::models::events::{Event, EventStatus, EventUpsertDBRequest};
use crate::errors::{Error, Result};

/// Maximum accepted title/name length for admin-entered records.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Whole-record write payload for an event, used by both create and replace.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventUpsert {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    pub status: EventStatus,
    /// A media reference previously produced by the upload endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl EventUpsert {
    /// Check the request against the form constraints before it reaches the
    /// database.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::BadRequest {
                message: "title must not be empty".to_string(),
            });
        }
        if self.title.len() > MAX_TITLE_LENGTH {
            return Err(Error::BadRequest {
                message: format!("title must be at most {MAX_TITLE_LENGTH} characters"),
            });
        }
        if self.description.trim().is_empty() {
            return Err(Error::BadRequest {
                message: "description must not be empty".to_string(),
            });
        }
        if let Some(ends_at) = self.ends_at {
            if ends_at < self.starts_at {
                return Err(Error::BadRequest {
                    message: "ends_at must not be before starts_at".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl From<EventUpsert> for EventUpsertDBRequest {
    fn from(request: EventUpsert) -> Self {
        Self {
            title: request.title,
            description: request.description,
            location: request.location,
            starts_at: request.starts_at,
            ends_at: request.ends_at,
            status: request.status,
            image_url: request.image_url,
        }
    }
}

/// Event as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    pub status: EventStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id.to_string(),
            title: event.title,
            description: event.description,
            location: event.location,
            starts_at: event.starts_at,
            ends_at: event.ends_at,
            status: event.status,
            image_url: event.image_url,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

impl Searchable for EventResponse {
    fn search_fields(&self) -> [Option<&str>; 2] {
        [Some(&self.title), Some(&self.description)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn upsert() -> EventUpsert {
        EventUpsert {
            title: "Summer Picnic".to_string(),
            description: "Annual gathering in the park".to_string(),
            location: Some("Riverside Park".to_string()),
            starts_at: Utc.with_ymd_and_hms(2026, 7, 4, 12, 0, 0).unwrap(),
            ends_at: Some(Utc.with_ymd_and_hms(2026, 7, 4, 16, 0, 0).unwrap()),
            status: EventStatus::Published,
            image_url: None,
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(upsert().validate().is_ok());
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut request = upsert();
        request.title = "   ".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn overlong_title_is_rejected() {
        let mut request = upsert();
        request.title = "x".repeat(MAX_TITLE_LENGTH + 1);
        assert!(request.validate().is_err());
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut request = upsert();
        request.ends_at = Some(Utc.with_ymd_and_hms(2026, 7, 4, 8, 0, 0).unwrap());
        assert!(request.validate().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_value(EventStatus::Published).unwrap();
        assert_eq!(json, serde_json::json!("published"));
    }
}
