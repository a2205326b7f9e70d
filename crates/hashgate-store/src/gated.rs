//! Existence-gated write and read-by-key.
//!
//! The write path probes before it writes and is not atomic: two callers
//! racing on the same key can both see it absent and both write. Keys are
//! derived from content, so both writes carry identical bytes and the
//! outcome is the same object.

use bytes::Bytes;
use hashgate_types::{ObjectKey, WriteStatus};
use serde::Serialize;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;
use crate::traits::ObjectStore;

/// Outcome of [`put_if_absent`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PutOutcome {
    pub status: WriteStatus,
    pub key: ObjectKey,
}

/// Write `payload` under `key` unless something is already there.
pub async fn put_if_absent(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &ObjectKey,
    payload: impl Into<Bytes>,
    content_type: &str,
) -> StoreResult<PutOutcome> {
    tracing::info!(bucket, %key, "checking for existing object");
    let exists = store.head_object(bucket, key).await?.is_some();
    tracing::info!(bucket, %key, exists, "existence probe finished");

    let status = if exists {
        WriteStatus::Exists
    } else {
        let object = StoredObject::new(key.clone(), payload, content_type);
        store.put_object(bucket, &object).await?;
        tracing::info!(bucket, %key, size = object.size(), "object uploaded");
        WriteStatus::Created
    };

    Ok(PutOutcome {
        status,
        key: key.clone(),
    })
}

/// Read the object at `key` and decode it as UTF-8 text.
pub async fn fetch(store: &dyn ObjectStore, bucket: &str, key: &ObjectKey) -> StoreResult<String> {
    if store.head_object(bucket, key).await?.is_none() {
        return Err(StoreError::NotFound(key.clone()));
    }
    // Deleted out-of-band between the probe and the read.
    let object = store
        .get_object(bucket, key)
        .await?
        .ok_or_else(|| StoreError::NotFound(key.clone()))?;
    String::from_utf8(object.data.to_vec()).map_err(|_| StoreError::InvalidUtf8(key.clone()))
}
