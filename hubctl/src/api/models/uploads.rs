//! API models and validation for media uploads.
//!
//! The constraints here are the upload bridge's external collaborator: the
//! bridge itself trusts its caller, so size and content-type checks run in
//! the handlers before a payload ever reaches it.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::UploadsConfig;
use crate::errors::{Error, Result};
use crate::media::UploadPayload;

/// Response for a bridged upload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Absolute URL of the stored content on the media host
    pub url: String,
}

/// Check a payload against the configured upload constraints.
pub fn validate_payload(payload: &UploadPayload, config: &UploadsConfig) -> Result<()> {
    if payload.bytes.is_empty() {
        return Err(Error::BadRequest {
            message: "uploaded file is empty".to_string(),
        });
    }
    if payload.size() as u64 > config.max_file_size {
        return Err(Error::PayloadTooLarge {
            message: format!(
                "uploaded file exceeds the maximum allowed size of {} bytes",
                config.max_file_size
            ),
        });
    }

    let declared = normalize_content_type(&payload.content_type);
    if !config
        .allowed_content_types
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&declared))
    {
        return Err(Error::UnsupportedMediaType {
            message: format!("content type '{declared}' is not accepted for upload"),
        });
    }

    Ok(())
}

/// Strip parameters and normalize case: `IMAGE/PNG; charset=binary` ->
/// `image/png`.
fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase()
}

/// Pick the effective content type for a multipart file part: the declared
/// type when present, a guess from the filename extension otherwise.
pub fn resolve_content_type(declared: Option<String>, filename: Option<&str>) -> String {
    if let Some(declared) = declared {
        return declared;
    }
    filename
        .and_then(|name| mime_guess::from_path(name).first_raw())
        .unwrap_or("application/octet-stream")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn config() -> UploadsConfig {
        UploadsConfig::default()
    }

    fn payload(bytes: &'static [u8], content_type: &str) -> UploadPayload {
        UploadPayload {
            bytes: Bytes::from_static(bytes),
            content_type: content_type.to_string(),
            filename: Some("logo.png".to_string()),
        }
    }

    #[test]
    fn accepts_a_small_png() {
        assert!(validate_payload(&payload(b"0123456789", "image/png"), &config()).is_ok());
    }

    #[test]
    fn rejects_an_empty_payload() {
        let err = validate_payload(&payload(b"", "image/png"), &config()).unwrap_err();
        assert!(matches!(err, Error::BadRequest { .. }));
    }

    #[test]
    fn rejects_an_oversized_payload() {
        let mut config = config();
        config.max_file_size = 4;
        let err = validate_payload(&payload(b"0123456789", "image/png"), &config).unwrap_err();
        assert!(matches!(err, Error::PayloadTooLarge { .. }));
    }

    #[test]
    fn rejects_a_disallowed_content_type() {
        let err = validate_payload(&payload(b"%PDF-1.7", "application/pdf"), &config()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedMediaType { .. }));
    }

    #[test]
    fn content_type_parameters_and_case_are_ignored() {
        assert!(validate_payload(&payload(b"0123456789", "IMAGE/PNG; charset=binary"), &config()).is_ok());
    }

    #[test]
    fn resolves_content_type_from_filename_when_undeclared() {
        assert_eq!(resolve_content_type(None, Some("logo.png")), "image/png");
        assert_eq!(resolve_content_type(None, Some("mystery")), "application/octet-stream");
        assert_eq!(
            resolve_content_type(Some("image/webp".to_string()), Some("logo.png")),
            "image/webp"
        );
    }
}
