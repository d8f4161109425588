//! API models for sponsors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;

use crate::api::models::events::MAX_TITLE_LENGTH;
use crate::api::models::search::Searchable;
use crate::db::models::sponsors::{Sponsor, SponsorUpsertDBRequest};
use crate::errors::{Error, Result};

/// Whole-record write payload for a sponsor.
///
/// `POST /sponsors` accepts these fields as multipart form parts alongside an
/// optional `logo` file; `PUT /sponsors/{id}` accepts them as JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SponsorUpsert {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    /// A media reference previously produced by the upload endpoint. For
    /// multipart creation this is filled in server-side from the bridged
    /// `logo` part instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl SponsorUpsert {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::BadRequest {
                message: "name must not be empty".to_string(),
            });
        }
        if self.name.len() > MAX_TITLE_LENGTH {
            return Err(Error::BadRequest {
                message: format!("name must be at most {MAX_TITLE_LENGTH} characters"),
            });
        }
        if let Some(website_url) = &self.website_url {
            Url::parse(website_url).map_err(|_| Error::BadRequest {
                message: format!("website_url '{website_url}' is not a valid absolute URL"),
            })?;
        }
        if let Some(contact_email) = &self.contact_email {
            if !is_plausible_email(contact_email) {
                return Err(Error::BadRequest {
                    message: format!("contact_email '{contact_email}' is not a valid email address"),
                });
            }
        }
        Ok(())
    }
}

/// Shape check, not RFC validation: one `@`, non-empty local part, and a
/// dotted domain without whitespace.
fn is_plausible_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.') && !s.contains(char::is_whitespace)
}

impl From<SponsorUpsert> for SponsorUpsertDBRequest {
    fn from(request: SponsorUpsert) -> Self {
        Self {
            name: request.name,
            description: request.description,
            website_url: request.website_url,
            contact_name: request.contact_name,
            contact_email: request.contact_email,
            logo_url: request.logo_url,
        }
    }
}

/// Sponsor as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SponsorResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Sponsor> for SponsorResponse {
    fn from(sponsor: Sponsor) -> Self {
        Self {
            id: sponsor.id.to_string(),
            name: sponsor.name,
            description: sponsor.description,
            website_url: sponsor.website_url,
            contact_name: sponsor.contact_name,
            contact_email: sponsor.contact_email,
            logo_url: sponsor.logo_url,
            created_at: sponsor.created_at,
            updated_at: sponsor.updated_at,
        }
    }
}

impl Searchable for SponsorResponse {
    fn search_fields(&self) -> [Option<&str>; 2] {
        [Some(&self.name), self.description.as_deref()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upsert() -> SponsorUpsert {
        SponsorUpsert {
            name: "Riverside Hardware".to_string(),
            description: Some("Local hardware store".to_string()),
            website_url: Some("https://riverside-hardware.example".to_string()),
            contact_name: Some("Sam Lee".to_string()),
            contact_email: Some("sam@riverside-hardware.example".to_string()),
            logo_url: None,
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(upsert().validate().is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut request = upsert();
        request.name = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn relative_website_url_is_rejected() {
        let mut request = upsert();
        request.website_url = Some("riverside-hardware.example/about".to_string());
        assert!(request.validate().is_err());
    }

    #[test]
    fn email_shape_check() {
        assert!(is_plausible_email("sam@riverside-hardware.example"));
        assert!(!is_plausible_email("sam"));
        assert!(!is_plausible_email("@example.com"));
        assert!(!is_plausible_email("sam@nodot"));
        assert!(!is_plausible_email("sam@.example"));
        assert!(!is_plausible_email("sam lee@example.com"));
    }
}
