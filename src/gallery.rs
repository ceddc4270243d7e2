//! Per-user gallery derived from store snapshots
//!
//! The gallery consumes the store's list-snapshot stream and turns each
//! snapshot into renderer-ready cards: newest first, download name
//! attached, and hard-filtered to the owning identity. Rendering the
//! cards (and wiring delete/download affordances) belongs to the view
//! layer, not here.

use tokio::sync::watch;

use crate::error::StoreError;
use crate::state::data::UserId;
use crate::store::{RecordId, RemoteStore, Snapshot, IMAGES_COLLECTION};

/// Everything a renderer needs for one image card.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryCard {
    /// Store key, passed back on delete
    pub id: RecordId,
    /// Displayable data URL of the stored JPEG
    pub image_url: String,
    /// Capture time in milliseconds
    pub captured_at: i64,
    /// Suggested filename for the download affordance
    pub download_name: String,
}

/// Live view over one user's images.
///
/// Consumers re-render from each full snapshot rather than patching the
/// previous card list. Records whose owner does not match the session
/// that opened the gallery are dropped even if the store returns them.
#[derive(Debug)]
pub struct Gallery {
    owner: UserId,
    snapshots: watch::Receiver<Snapshot>,
}

impl Gallery {
    /// Subscribe to the given owner's records.
    pub async fn open(store: &dyn RemoteStore, owner: UserId) -> Result<Self, StoreError> {
        let snapshots = store.query_by_owner(IMAGES_COLLECTION, &owner).await?;
        Ok(Gallery { owner, snapshots })
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Cards for the current snapshot, newest capture first.
    pub fn cards(&self) -> Vec<GalleryCard> {
        let snapshot = self.snapshots.borrow();
        let mut cards: Vec<GalleryCard> = snapshot
            .iter()
            .filter(|(_, record)| record.user_id == self.owner)
            .map(|(id, record)| GalleryCard {
                id: id.clone(),
                image_url: record.image_url.clone(),
                captured_at: record.timestamp,
                download_name: record.download_name(),
            })
            .collect();

        // Timestamps are strictly increasing per pipeline; id breaks
        // ties across clients
        cards.sort_by(|a, b| {
            b.captured_at.cmp(&a.captured_at).then_with(|| b.id.cmp(&a.id))
        });
        cards
    }

    /// Wait for the next snapshot. Returns false once the store side
    /// of the subscription is gone.
    pub async fn changed(&mut self) -> bool {
        self.snapshots.changed().await.is_ok()
    }
}
