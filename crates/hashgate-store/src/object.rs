use bytes::Bytes;
use hashgate_types::ObjectKey;

/// Content type written when none is configured.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// A stored object: key + payload bytes + declared content type.
///
/// Objects are written once and never updated through hashgate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub key: ObjectKey,
    pub data: Bytes,
    pub content_type: String,
}

impl StoredObject {
    pub fn new(key: ObjectKey, data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            key,
            data: data.into(),
            content_type: content_type.into(),
        }
    }

    /// Size of the payload in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Metadata view, as a head request would report it.
    pub fn meta(&self) -> ObjectMeta {
        ObjectMeta {
            key: self.key.clone(),
            size: self.size(),
            content_type: Some(self.content_type.clone()),
        }
    }

    /// Decode the payload as UTF-8 text.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

/// What a metadata-only existence probe returns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectMeta {
    pub key: ObjectKey,
    pub size: u64,
    pub content_type: Option<String>,
}
