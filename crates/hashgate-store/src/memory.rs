use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use hashgate_types::ObjectKey;

use crate::error::{StoreError, StoreResult};
use crate::object::{ObjectMeta, StoredObject};
use crate::traits::ObjectStore;

/// In-memory, HashMap-based object store.
///
/// Intended for tests and local runs. Objects are keyed by
/// `(bucket, key)` and held behind a `RwLock`; they are cloned on read.
///
/// The inspection helpers (`len`, `total_bytes`, `keys`) panic if a writer
/// panicked while holding the lock. The `ObjectStore` methods report the
/// same condition as `StoreError::Backend` instead.
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<(String, ObjectKey), StoredObject>>,
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of objects currently stored, across all buckets.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total bytes across all stored objects.
    pub fn total_bytes(&self) -> u64 {
        self.objects
            .read()
            .expect("lock poisoned")
            .values()
            .map(StoredObject::size)
            .sum()
    }

    /// Sorted keys held in `bucket`.
    pub fn keys(&self, bucket: &str) -> Vec<ObjectKey> {
        let map = self.objects.read().expect("lock poisoned");
        let mut keys: Vec<ObjectKey> = map
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("in-memory store lock poisoned".into())
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn head_object(&self, bucket: &str, key: &ObjectKey) -> StoreResult<Option<ObjectMeta>> {
        let map = self.objects.read().map_err(|_| poisoned())?;
        Ok(map
            .get(&(bucket.to_string(), key.clone()))
            .map(StoredObject::meta))
    }

    async fn get_object(&self, bucket: &str, key: &ObjectKey) -> StoreResult<Option<StoredObject>> {
        let map = self.objects.read().map_err(|_| poisoned())?;
        Ok(map.get(&(bucket.to_string(), key.clone())).cloned())
    }

    async fn put_object(&self, bucket: &str, object: &StoredObject) -> StoreResult<()> {
        let mut map = self.objects.write().map_err(|_| poisoned())?;
        map.insert((bucket.to_string(), object.key.clone()), object.clone());
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field(
                "object_count",
                &self.objects.read().unwrap_or_else(PoisonError::into_inner).len(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::DEFAULT_CONTENT_TYPE;

    const BUCKET: &str = "blobs";

    fn key(s: &str) -> ObjectKey {
        ObjectKey::parse(s).unwrap()
    }

    fn object(k: &str, data: &[u8]) -> StoredObject {
        StoredObject::new(key(k), data.to_vec(), DEFAULT_CONTENT_TYPE)
    }

    #[tokio::test]
    async fn put_then_get() {
        let store = InMemoryObjectStore::new();
        let obj = object("a.txt", b"hello world");
        store.put_object(BUCKET, &obj).await.unwrap();

        let read_back = store.get_object(BUCKET, &key("a.txt")).await.unwrap();
        assert_eq!(read_back, Some(obj));
    }

    #[tokio::test]
    async fn head_reports_metadata() {
        let store = InMemoryObjectStore::new();
        store.put_object(BUCKET, &object("a.txt", b"12345")).await.unwrap();

        let meta = store.head_object(BUCKET, &key("a.txt")).await.unwrap().unwrap();
        assert_eq!(meta.size, 5);
        assert_eq!(meta.content_type.as_deref(), Some(DEFAULT_CONTENT_TYPE));
    }

    #[tokio::test]
    async fn missing_object_is_none() {
        let store = InMemoryObjectStore::new();
        assert!(store.head_object(BUCKET, &key("nope")).await.unwrap().is_none());
        assert!(store.get_object(BUCKET, &key("nope")).await.unwrap().is_none());
        assert!(!store.exists(BUCKET, &key("nope")).await.unwrap());
    }

    #[tokio::test]
    async fn buckets_are_isolated() {
        let store = InMemoryObjectStore::new();
        store.put_object("one", &object("a.txt", b"x")).await.unwrap();

        assert!(store.exists("one", &key("a.txt")).await.unwrap());
        assert!(!store.exists("two", &key("a.txt")).await.unwrap());
        assert_eq!(store.keys("one"), vec![key("a.txt")]);
        assert!(store.keys("two").is_empty());
    }

    #[tokio::test]
    async fn put_overwrites() {
        let store = InMemoryObjectStore::new();
        store.put_object(BUCKET, &object("a.txt", b"first")).await.unwrap();
        store.put_object(BUCKET, &object("a.txt", b"second")).await.unwrap();

        assert_eq!(store.len(), 1);
        let obj = store.get_object(BUCKET, &key("a.txt")).await.unwrap().unwrap();
        assert_eq!(&obj.data[..], b"second");
    }

    #[tokio::test]
    async fn len_and_total_bytes() {
        let store = InMemoryObjectStore::default();
        assert!(store.is_empty());
        store.put_object(BUCKET, &object("a", b"12345")).await.unwrap();
        store.put_object(BUCKET, &object("b", b"123456789")).await.unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.total_bytes(), 14);
    }

    #[tokio::test]
    async fn keys_are_sorted() {
        let store = InMemoryObjectStore::new();
        for k in ["c.txt", "a.txt", "b.txt"] {
            store.put_object(BUCKET, &object(k, b"x")).await.unwrap();
        }
        assert_eq!(store.keys(BUCKET), vec![key("a.txt"), key("b.txt"), key("c.txt")]);
    }

    fn poison(store: &InMemoryObjectStore) {
        std::thread::scope(|s| {
            let _ = s
                .spawn(|| {
                    let _guard = store.objects.write().unwrap();
                    panic!("writer died");
                })
                .join();
        });
    }

    #[test]
    #[should_panic(expected = "lock poisoned")]
    fn len_panics_on_poisoned_lock() {
        let store = InMemoryObjectStore::new();
        poison(&store);
        store.len();
    }

    #[test]
    #[should_panic(expected = "lock poisoned")]
    fn total_bytes_panics_on_poisoned_lock() {
        let store = InMemoryObjectStore::new();
        poison(&store);
        store.total_bytes();
    }

    #[tokio::test]
    async fn poisoned_lock_is_backend_error() {
        let store = InMemoryObjectStore::new();
        poison(&store);

        let err = store.head_object(BUCKET, &key("a.txt")).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
        let err = store.put_object(BUCKET, &object("a.txt", b"x")).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
        assert!(format!("{store:?}").contains("object_count"));
    }

    #[test]
    fn debug_format() {
        let store = InMemoryObjectStore::new();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryObjectStore"));
        assert!(debug.contains("object_count"));
    }
}
