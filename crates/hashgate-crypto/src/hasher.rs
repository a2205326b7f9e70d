use hashgate_types::{ObjectKey, TypeError};

use crate::algorithm::DigestAlgorithm;

/// Content hasher bound to one digest algorithm.
///
/// The key for a payload depends only on its bytes and the extension, so the
/// same upload always maps onto the same object and duplicates collapse
/// without any index on the side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContentHasher {
    algorithm: DigestAlgorithm,
}

impl ContentHasher {
    /// SHA-256 hasher, the one every minted key uses unless configured otherwise.
    pub const SHA256: Self = Self {
        algorithm: DigestAlgorithm::Sha256,
    };

    pub const fn new(algorithm: DigestAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Lowercase hex digest of `data`.
    pub fn digest_hex(&self, data: &[u8]) -> String {
        hex::encode(self.algorithm.digest(data))
    }

    /// Object key for `data` stored with `extension`.
    pub fn key_for(&self, data: &[u8], extension: &str) -> Result<ObjectKey, HasherError> {
        Ok(ObjectKey::from_parts(&self.digest_hex(data), extension)?)
    }

    /// Whether `data` hashes to the digest part of `key`.
    pub fn verify(&self, data: &[u8], key: &ObjectKey) -> bool {
        self.digest_hex(data) == key.digest_part()
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }
}

/// Derive the object key for `payload` under `algorithm`.
pub fn compute_key(
    payload: &[u8],
    extension: &str,
    algorithm: DigestAlgorithm,
) -> Result<ObjectKey, HasherError> {
    ContentHasher::new(algorithm).key_for(payload, extension)
}

/// Same as [`compute_key`], with the algorithm given by name.
pub fn compute_key_with(
    payload: &[u8],
    extension: &str,
    algorithm: &str,
) -> Result<ObjectKey, HasherError> {
    compute_key(payload, extension, algorithm.parse()?)
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("unsupported digest algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error(transparent)]
    Key(#[from] TypeError),
}
