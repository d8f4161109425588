//! Media host abstraction layer
//!
//! This module defines the `MediaStore` trait which abstracts the external
//! media host behind a minimal capability: store one binary payload under a
//! destination category and get back a durable public URL. Each invocation
//! performs exactly one transmission and resolves exactly once, with either a
//! reference or an error. The bridge does no retrying, no caching, and no
//! deduplication, and it does not validate payloads - size and content-type
//! constraints are enforced at the API boundary before it is invoked.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use url::Url;

use crate::config::MediaConfig;

pub mod cloudinary;
pub mod dummy;

/// Create a media store from configuration
///
/// This is the single point where we convert config into store instances.
/// Adding a new host requires adding a match arm here.
pub fn create_store(config: MediaConfig) -> Arc<dyn MediaStore> {
    match config {
        MediaConfig::Cloudinary(cloudinary_config) => Arc::new(cloudinary::CloudinaryStore::from(cloudinary_config)),
        MediaConfig::Dummy(dummy_config) => Arc::new(dummy::DummyStore::from(dummy_config)),
    }
}

/// Result type for media store operations
pub type Result<T> = std::result::Result<T, MediaError>;

/// Errors that can occur while bridging a payload to the media host
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The host received the upload and rejected it (quota, malformed
    /// content, bad credentials). The host's message is carried unchanged.
    #[error("media host rejected the upload ({status:?}): {message}")]
    Host { status: Option<u16>, message: String },

    /// The upload never completed at the transport level
    #[error("failed to reach the media host: {0}")]
    Transport(#[from] reqwest::Error),

    /// The host reported success but the response did not contain a usable
    /// reference
    #[error("media host returned an unusable response: {0}")]
    InvalidResponse(String),
}

/// One binary payload, fully buffered in memory before transmission.
///
/// The declared content type is trusted as-is; callers are expected to have
/// validated it against the configured allow-list already.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    pub bytes: Bytes,
    pub content_type: String,
    pub filename: Option<String>,
}

impl UploadPayload {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Abstract media host interface
///
/// Implementors convert an in-memory payload into a durable public reference
/// on their backing host.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload one payload under the given destination category.
    ///
    /// Resolves exactly once: with the absolute URL the host assigned, or
    /// with the host's error. A failed upload leaves no durable artifact and
    /// requires no cleanup on the caller's side.
    async fn store(&self, payload: UploadPayload, category: &str) -> Result<Url>;
}
