use async_trait::async_trait;
use hashgate_types::ObjectKey;

use crate::error::StoreResult;
use crate::object::{ObjectMeta, StoredObject};

/// Remote key/object storage addressed by `(bucket, key)`.
///
/// All implementations must satisfy these invariants:
/// - A missing object is `Ok(None)`, never an error. Only transport or
///   service failures surface as `Err`.
/// - `put_object` overwrites unconditionally. Callers that need
///   write-once semantics go through [`crate::gated::put_if_absent`].
/// - The store never interprets object contents.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Metadata-only existence probe.
    async fn head_object(&self, bucket: &str, key: &ObjectKey) -> StoreResult<Option<ObjectMeta>>;

    /// Fetch the full object.
    async fn get_object(&self, bucket: &str, key: &ObjectKey) -> StoreResult<Option<StoredObject>>;

    /// Write `object` under its key.
    async fn put_object(&self, bucket: &str, object: &StoredObject) -> StoreResult<()>;

    /// Check whether an object exists.
    async fn exists(&self, bucket: &str, key: &ObjectKey) -> StoreResult<bool> {
        Ok(self.head_object(bucket, key).await?.is_some())
    }
}
