use std::sync::Arc;

use bytes::Bytes;
use hashgate_crypto::ContentHasher;
use hashgate_types::ObjectKey;

use crate::error::StoreResult;
use crate::gated::{self, PutOutcome};
use crate::object::DEFAULT_CONTENT_TYPE;
use crate::traits::ObjectStore;

/// Content-addressed view over one bucket of an [`ObjectStore`].
///
/// Built once at startup and shared read-only across requests.
#[derive(Clone)]
pub struct ContentStore {
    backend: Arc<dyn ObjectStore>,
    bucket: String,
    hasher: ContentHasher,
    content_type: String,
}

impl ContentStore {
    pub fn new(backend: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            backend,
            bucket: bucket.into(),
            hasher: ContentHasher::default(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }

    pub fn with_hasher(mut self, hasher: ContentHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn hasher(&self) -> ContentHasher {
        self.hasher
    }

    /// Key that `payload` would be stored under.
    pub fn key_for(&self, payload: &[u8], extension: &str) -> StoreResult<ObjectKey> {
        Ok(self.hasher.key_for(payload, extension)?)
    }

    /// Derive the key for `payload` and write it if absent.
    pub async fn store(&self, payload: impl Into<Bytes>, extension: &str) -> StoreResult<PutOutcome> {
        let payload = payload.into();
        let key = self.key_for(&payload, extension)?;
        tracing::info!(%key, algorithm = %self.hasher.algorithm(), "derived object key");
        self.put_if_absent(&key, payload).await
    }

    pub async fn put_if_absent(&self, key: &ObjectKey, payload: Bytes) -> StoreResult<PutOutcome> {
        gated::put_if_absent(
            self.backend.as_ref(),
            &self.bucket,
            key,
            payload,
            &self.content_type,
        )
        .await
    }

    pub async fn fetch(&self, key: &ObjectKey) -> StoreResult<String> {
        gated::fetch(self.backend.as_ref(), &self.bucket, key).await
    }
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("bucket", &self.bucket)
            .field("algorithm", &self.hasher.algorithm())
            .field("content_type", &self.content_type)
            .finish()
    }
}
