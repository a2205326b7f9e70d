use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("object key must not be empty")]
    EmptyKey,

    #[error("extension must not be empty")]
    EmptyExtension,

    #[error("invalid digest: {0}")]
    InvalidDigest(String),
}
