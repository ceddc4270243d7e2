//! Shared data structures for the application state
//!
//! These structs represent the data model that flows between
//! the remote store layer and the gallery layer.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of the stored image text. The encoded JPEG is persisted as a
/// self-describing data URL so a renderer can display it directly.
pub const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Opaque identity assigned by the identity provider.
///
/// The crate never inspects the contents; it only compares owners.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One stored image plus its owner and capture time.
///
/// Persisted as a flat map under a single shared collection, keyed by a
/// store-generated record id. Field names match the persisted layout
/// exactly. Records are never mutated in place: created on successful
/// capture, deleted on explicit request, nothing else.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ImageRecord {
    /// The normalized JPEG as a base64 data URL
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    /// Capture time in milliseconds, monotonically increasing per pipeline
    pub timestamp: i64,
    /// Identity of the session active when the record was created
    #[serde(rename = "userId")]
    pub user_id: UserId,
}

impl ImageRecord {
    /// Build a record from normalized JPEG bytes.
    pub fn new(encoded_jpeg: &[u8], user_id: UserId, timestamp: i64) -> Self {
        ImageRecord {
            image_url: format!("{}{}", DATA_URL_PREFIX, BASE64.encode(encoded_jpeg)),
            timestamp,
            user_id,
        }
    }

    /// Decode the stored data URL back into JPEG bytes.
    ///
    /// Returns None if the stored text is not a JPEG data URL (a record
    /// written by some other client, for example).
    pub fn jpeg_bytes(&self) -> Option<Vec<u8>> {
        let encoded = self.image_url.strip_prefix(DATA_URL_PREFIX)?;
        BASE64.decode(encoded).ok()
    }

    /// Suggested filename for the download affordance.
    pub fn download_name(&self) -> String {
        format!("IMG_{}.jpg", self.timestamp)
    }
}
