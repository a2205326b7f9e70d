//! Content addressing for hashgate.
//!
//! Turns payload bytes into the object key they are stored under:
//! `hex(digest(payload)) + "." + extension`. SHA-256 is the default digest;
//! SHA-384, SHA-512 and BLAKE3 are available when chosen explicitly.
//!
//! All digests come from established libraries — no custom cryptography.

pub mod algorithm;
pub mod hasher;

pub use algorithm::DigestAlgorithm;
pub use hasher::{compute_key, compute_key_with, ContentHasher, HasherError};
