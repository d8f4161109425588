//! Cloudinary media store implementation

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use url::Url;

use crate::config::CloudinaryConfig;
use crate::media::{MediaError, MediaStore, Result, UploadPayload};

/// Cloudinary media store
///
/// Performs signed one-shot uploads against the account's upload endpoint.
/// The client is built without a request timeout: completion is awaited
/// indefinitely, matching the bridge contract of exactly one outcome per
/// invocation with no retry.
pub struct CloudinaryStore {
    cloud_name: String,
    api_key: String,
    api_secret: String,
    api_base: Url,
    http: reqwest::Client,
}

impl From<CloudinaryConfig> for CloudinaryStore {
    fn from(config: CloudinaryConfig) -> Self {
        Self {
            cloud_name: config.cloud_name,
            api_key: config.api_key,
            api_secret: config.api_secret,
            api_base: config.api_base,
            http: reqwest::Client::new(),
        }
    }
}

impl CloudinaryStore {
    fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.api_base.as_str().trim_end_matches('/'),
            self.cloud_name
        )
    }
}

/// Compute the request signature: the SHA-256 hex digest of the signed
/// parameters sorted by key, joined as `key=value` pairs with `&`, with the
/// API secret appended. The account must be configured for sha256 signatures.
fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut params: Vec<&(&str, &str)> = params.iter().collect();
    params.sort_by_key(|(key, _)| *key);

    let to_sign = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// The subset of the upload response the bridge cares about
#[derive(Debug, Deserialize)]
struct UploadResponseBody {
    secure_url: Option<String>,
}

/// Error envelope returned by the host on rejected uploads
#[derive(Debug, Deserialize)]
struct ErrorResponseBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    async fn store(&self, payload: UploadPayload, category: &str) -> Result<Url> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign(&[("folder", category), ("timestamp", &timestamp)], &self.api_secret);

        let filename = payload
            .filename
            .clone()
            .unwrap_or_else(|| "upload.bin".to_string());
        let file_part = reqwest::multipart::Part::bytes(payload.bytes.to_vec())
            .file_name(filename)
            .mime_str(&payload.content_type)?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", category.to_string())
            .text("signature", signature);

        tracing::debug!(
            category = category,
            bytes = payload.size(),
            content_type = %payload.content_type,
            "Uploading payload to media host"
        );

        let response = self.http.post(self.upload_url()).multipart(form).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // The host wraps rejections in an error envelope; fall back to the
            // raw body when it does not parse
            let message = serde_json::from_str::<ErrorResponseBody>(&body)
                .map(|parsed| parsed.error.message)
                .unwrap_or(body);
            tracing::warn!(status = status.as_u16(), message = %message, "Media host rejected upload");
            return Err(MediaError::Host {
                status: Some(status.as_u16()),
                message,
            });
        }

        let body: UploadResponseBody = response.json().await?;
        let reference = body
            .secure_url
            .ok_or_else(|| MediaError::InvalidResponse("upload response missing secure_url".to_string()))?;

        Url::parse(&reference).map_err(|e| MediaError::InvalidResponse(format!("secure_url is not an absolute URL: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Install the rustls crypto provider once for the test process. Production
    /// does this in `main`; the unit tests build `reqwest::Client`s directly, so
    /// they need the same one-time setup before any client is constructed.
    fn ensure_crypto_provider() {
        use std::sync::Once;
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        });
    }

    fn store_for(server: &MockServer) -> CloudinaryStore {
        ensure_crypto_provider();
        CloudinaryStore::from(CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            api_base: Url::parse(&server.uri()).unwrap(),
        })
    }

    fn payload(bytes: &'static [u8]) -> UploadPayload {
        UploadPayload {
            bytes: Bytes::from_static(bytes),
            content_type: "image/png".to_string(),
            filename: Some("logo.png".to_string()),
        }
    }

    #[test]
    fn signature_is_hex_and_deterministic() {
        let a = sign(&[("folder", "project-logos"), ("timestamp", "1700000000")], "secret");
        let b = sign(&[("folder", "project-logos"), ("timestamp", "1700000000")], "secret");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn signature_is_independent_of_param_order() {
        let a = sign(&[("folder", "project-logos"), ("timestamp", "1700000000")], "secret");
        let b = sign(&[("timestamp", "1700000000"), ("folder", "project-logos")], "secret");
        assert_eq!(a, b);
    }

    #[test]
    fn signature_changes_with_params_and_secret() {
        let base = sign(&[("folder", "a"), ("timestamp", "1")], "secret");
        assert_ne!(base, sign(&[("folder", "b"), ("timestamp", "1")], "secret"));
        assert_ne!(base, sign(&[("folder", "a"), ("timestamp", "2")], "secret"));
        assert_ne!(base, sign(&[("folder", "a"), ("timestamp", "1")], "other"));
    }

    #[test_log::test(tokio::test)]
    async fn resolves_with_the_exact_secure_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1_1/demo/image/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "public_id": "project-logos/abc123",
                "secure_url": "https://cdn.example/project-logos/abc123.png"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let url = store_for(&server)
            .store(payload(b"0123456789"), "project-logos")
            .await
            .unwrap();

        assert_eq!(url.as_str(), "https://cdn.example/project-logos/abc123.png");
    }

    #[test_log::test(tokio::test)]
    async fn identical_payloads_are_transmitted_once_each() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1_1/demo/image/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "secure_url": "https://cdn.example/project-logos/abc123.png"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let store = store_for(&server);
        store.store(payload(b"same bytes"), "project-logos").await.unwrap();
        store.store(payload(b"same bytes"), "project-logos").await.unwrap();
        // wiremock verifies on drop that exactly two uploads went out
    }

    #[test_log::test(tokio::test)]
    async fn host_rejection_surfaces_the_host_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1_1/demo/image/upload"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "message": "Invalid image file" }
            })))
            .mount(&server)
            .await;

        let err = store_for(&server)
            .store(payload(b"not an image"), "project-logos")
            .await
            .unwrap_err();

        match err {
            MediaError::Host { status, message } => {
                assert_eq!(status, Some(400));
                assert_eq!(message, "Invalid image file");
            }
            other => panic!("expected Host error, got {other:?}"),
        }
    }

    #[test_log::test(tokio::test)]
    async fn unreachable_host_is_a_transport_rejection() {
        // Grab an ephemeral port that nothing listens on anymore
        let dead_uri = {
            let server = MockServer::start().await;
            server.uri()
        };

        ensure_crypto_provider();
        let store = CloudinaryStore::from(CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            api_base: Url::parse(&dead_uri).unwrap(),
        });

        let err = store.store(payload(b"0123456789"), "project-logos").await.unwrap_err();
        assert!(matches!(err, MediaError::Transport(_)));
    }

    #[test_log::test(tokio::test)]
    async fn success_without_secure_url_is_an_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1_1/demo/image/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "public_id": "project-logos/abc123"
            })))
            .mount(&server)
            .await;

        let err = store_for(&server)
            .store(payload(b"0123456789"), "project-logos")
            .await
            .unwrap_err();

        assert!(matches!(err, MediaError::InvalidResponse(_)));
    }

    #[test_log::test(tokio::test)]
    async fn relative_secure_url_is_an_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1_1/demo/image/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "secure_url": "project-logos/abc123.png"
            })))
            .mount(&server)
            .await;

        let err = store_for(&server)
            .store(payload(b"0123456789"), "project-logos")
            .await
            .unwrap_err();

        assert!(matches!(err, MediaError::InvalidResponse(_)));
    }
}
