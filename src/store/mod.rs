//! Remote store collaborator
//!
//! The hosted realtime data store is external to this crate; it is
//! consumed through the `RemoteStore` trait. Queries are modeled as a
//! subscribable stream of list snapshots: the store re-delivers the
//! full per-owner list on every change and consumers re-render from
//! each snapshot, never by patching a view incrementally.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::watch;

use crate::error::StoreError;
use crate::state::data::{ImageRecord, UserId};

pub mod memory;

pub use memory::MemoryStore;

/// The single shared collection holding every user's image records.
pub const IMAGES_COLLECTION: &str = "images";

/// Opaque, store-generated key for one record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        RecordId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One full per-owner listing, re-delivered on every change.
pub type Snapshot = Vec<(RecordId, ImageRecord)>;

/// Insert/query/delete surface of the hosted data store.
///
/// Implementations must deliver the current snapshot immediately on
/// subscription, then a fresh snapshot after every insert or delete
/// that touches the queried owner.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Store a record under a fresh store-generated id.
    async fn insert(&self, collection: &str, record: ImageRecord) -> Result<RecordId, StoreError>;

    /// Subscribe to the live list of records owned by `owner`.
    ///
    /// Dropping the receiver ends the subscription; re-subscribing
    /// starts over from the current snapshot.
    async fn query_by_owner(
        &self,
        collection: &str,
        owner: &UserId,
    ) -> Result<watch::Receiver<Snapshot>, StoreError>;

    /// Remove one record. The caller's view must not drop the card
    /// until this confirms.
    async fn delete(&self, collection: &str, id: &RecordId) -> Result<(), StoreError>;
}
