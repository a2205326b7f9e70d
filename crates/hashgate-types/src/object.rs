use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Key under which an object lives in the bucket.
///
/// Keys minted by hashgate have the shape `"<hex digest>.<extension>"`, so
/// identical payloads with the same extension always land on the same key.
/// The read path accepts any non-empty caller-supplied key, which is why
/// [`ObjectKey::parse`] does not insist on that shape.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Build a key from a lowercase hex digest and an extension.
    pub fn from_parts(digest_hex: &str, extension: &str) -> Result<Self, TypeError> {
        if digest_hex.is_empty()
            || !digest_hex
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return Err(TypeError::InvalidDigest(digest_hex.to_string()));
        }
        if extension.is_empty() {
            return Err(TypeError::EmptyExtension);
        }
        Ok(Self(format!("{digest_hex}.{extension}")))
    }

    /// Accept an arbitrary caller-supplied key. Only emptiness is rejected.
    pub fn parse(s: impl Into<String>) -> Result<Self, TypeError> {
        let s = s.into();
        if s.is_empty() {
            return Err(TypeError::EmptyKey);
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text before the first `.`; the whole key if there is none.
    pub fn digest_part(&self) -> &str {
        self.0.split_once('.').map_or(self.0.as_str(), |(d, _)| d)
    }

    /// Text after the first `.`, if any.
    pub fn extension(&self) -> Option<&str> {
        self.0.split_once('.').map(|(_, ext)| ext)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectKey({})", self.0)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ObjectKey {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<ObjectKey> for String {
    fn from(key: ObjectKey) -> Self {
        key.0
    }
}
