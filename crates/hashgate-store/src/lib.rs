//! Object storage for hashgate.
//!
//! Objects live in a single bucket of a remote key/object service and are
//! addressed by a key derived from their content. This crate holds the
//! storage seam, its backends, and the existence-gated write/fetch path that
//! sits on top of them.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`S3ObjectStore`] -- any S3-compatible service via the AWS SDK
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and local runs
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written; hashgate has no update or delete.
//! 2. A missing object is a value (`None` / [`StoreError::NotFound`]), not a failure.
//! 3. Existence check and write are not atomic. Duplicate writes carry identical bytes.
//! 4. Backend errors are propagated, never retried.

pub mod content;
pub mod error;
pub mod gated;
pub mod memory;
pub mod object;
pub mod s3;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use content::ContentStore;
pub use error::{StoreError, StoreResult};
pub use gated::{fetch, put_if_absent, PutOutcome};
pub use memory::InMemoryObjectStore;
pub use object::{ObjectMeta, StoredObject, DEFAULT_CONTENT_TYPE};
pub use s3::{S3ObjectStore, S3Settings};
pub use traits::ObjectStore;
