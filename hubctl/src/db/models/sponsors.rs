//! Database models for sponsors.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::types::SponsorId;

/// Database model for a sponsor.
#[derive(Debug, Clone, FromRow)]
pub struct Sponsor {
    pub id: SponsorId,
    pub name: String,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Whole-record write request for a sponsor.
#[derive(Debug, Clone)]
pub struct SponsorUpsertDBRequest {
    pub name: String,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub logo_url: Option<String>,
}
