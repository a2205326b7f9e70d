use hashgate_crypto::HasherError;
use hashgate_types::ObjectKey;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested object was not found.
    #[error("object not found: {0}")]
    NotFound(ObjectKey),

    /// The object exists but its body is not valid UTF-8 text.
    #[error("object {0} is not valid UTF-8")]
    InvalidUtf8(ObjectKey),

    /// Key derivation failed before the store was touched.
    #[error("key derivation failed: {0}")]
    Key(#[from] HasherError),

    /// Any transport or service failure reported by the backend.
    #[error("{0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
