//! Dummy media store implementation
//!
//! Stores nothing and fabricates unique references under a configurable base
//! URL. Useful for development without host credentials, and for exercising
//! the bridge contract in tests, including the simulated-failure path.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use url::Url;
use uuid::Uuid;

use crate::config::DummyMediaConfig;
use crate::media::{MediaError, MediaStore, Result, UploadPayload};

/// Dummy media store that resolves every upload with a fresh fake reference
pub struct DummyStore {
    base_url: Url,
    fail_uploads: bool,
    stored: AtomicU64,
}

impl From<DummyMediaConfig> for DummyStore {
    fn from(config: DummyMediaConfig) -> Self {
        Self {
            base_url: config.base_url,
            fail_uploads: config.fail_uploads,
            stored: AtomicU64::new(0),
        }
    }
}

impl DummyStore {
    /// Number of uploads this store has accepted
    pub fn stored_count(&self) -> u64 {
        self.stored.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl MediaStore for DummyStore {
    async fn store(&self, payload: UploadPayload, category: &str) -> Result<Url> {
        if self.fail_uploads {
            return Err(MediaError::Host {
                status: None,
                message: "dummy media store is configured to fail uploads".to_string(),
            });
        }

        let sequence = self.stored.fetch_add(1, Ordering::Relaxed);
        // Mirror the real host's behavior: a fresh object per call, even for
        // byte-identical payloads
        let extension = payload
            .content_type
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("bin");
        let reference = self
            .base_url
            .join(&format!("{category}/{}-{sequence}.{extension}", Uuid::new_v4()))
            .map_err(|e| MediaError::InvalidResponse(format!("could not build dummy reference: {e}")))?;

        tracing::info!(
            category = category,
            bytes = payload.size(),
            reference = %reference,
            "Dummy media store accepted upload"
        );

        Ok(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use tokio_test::{assert_err, assert_ok};

    fn store() -> DummyStore {
        DummyStore::from(DummyMediaConfig {
            base_url: Url::parse("https://media.invalid/").unwrap(),
            fail_uploads: false,
        })
    }

    fn payload() -> UploadPayload {
        UploadPayload {
            bytes: Bytes::from_static(b"0123456789"),
            content_type: "image/png".to_string(),
            filename: Some("logo.png".to_string()),
        }
    }

    #[tokio::test]
    async fn yields_exactly_one_absolute_url() {
        let url = assert_ok!(store().store(payload(), "project-logos").await);
        assert!(url.as_str().starts_with("https://media.invalid/project-logos/"));
        assert!(url.as_str().ends_with(".png"));
    }

    #[tokio::test]
    async fn identical_payloads_yield_distinct_references() {
        let store = store();
        let first = store.store(payload(), "project-logos").await.unwrap();
        let second = store.store(payload(), "project-logos").await.unwrap();
        assert_ne!(first, second);
        assert_eq!(store.stored_count(), 2);
    }

    #[tokio::test]
    async fn failing_mode_rejects_without_a_reference() {
        let store = DummyStore::from(DummyMediaConfig {
            base_url: Url::parse("https://media.invalid/").unwrap(),
            fail_uploads: true,
        });
        let err = assert_err!(store.store(payload(), "project-logos").await);
        assert!(matches!(err, MediaError::Host { status: None, .. }));
        assert_eq!(store.stored_count(), 0);
    }
}
