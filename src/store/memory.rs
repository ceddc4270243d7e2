//! In-memory store used by tests and examples
//!
//! Not a stand-in for the hosted service's durability or permissions,
//! just enough of its observable behavior to exercise the capture and
//! gallery paths: ordered push ids, per-owner snapshot delivery, and a
//! switch to simulate the store being unreachable.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::watch;

use crate::error::StoreError;
use crate::state::data::{ImageRecord, UserId};
use crate::store::{RecordId, RemoteStore, Snapshot};

#[derive(Default)]
struct Inner {
    /// collection name -> records in push order (ids sort by insertion)
    collections: HashMap<String, BTreeMap<RecordId, ImageRecord>>,
    /// (collection, owner) -> snapshot channel for active subscriptions
    watchers: HashMap<(String, UserId), watch::Sender<Snapshot>>,
    next_id: u64,
}

impl Inner {
    fn snapshot(&self, collection: &str, owner: &UserId) -> Snapshot {
        self.collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|(_, record)| &record.user_id == owner)
                    .map(|(id, record)| (id.clone(), record.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn notify(&mut self, collection: &str, owner: &UserId) {
        let key = (collection.to_string(), owner.clone());
        let dead = match self.watchers.get(&key) {
            None => return,
            Some(tx) => tx.receiver_count() == 0,
        };
        if dead {
            // Subscription ended; a later resubscribe starts over from
            // the snapshot current at that point
            self.watchers.remove(&key);
            return;
        }
        let snapshot = self.snapshot(collection, owner);
        if let Some(tx) = self.watchers.get(&key) {
            tx.send_replace(snapshot);
        }
    }
}

/// Process-local `RemoteStore` implementation.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreError::Unavailable`,
    /// or restore service. For exercising error surfacing.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of records currently held in a collection.
    pub fn record_count(&self, collection: &str) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.collections.get(collection).map_or(0, |c| c.len())
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("store is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn insert(&self, collection: &str, record: ImageRecord) -> Result<RecordId, StoreError> {
        self.check_online()?;
        let mut inner = self.inner.lock().unwrap();

        inner.next_id += 1;
        // Zero-padded so lexicographic id order matches push order
        let id = RecordId::new(format!("rec-{:012}", inner.next_id));
        let owner = record.user_id.clone();

        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), record);
        inner.notify(collection, &owner);

        Ok(id)
    }

    async fn query_by_owner(
        &self,
        collection: &str,
        owner: &UserId,
    ) -> Result<watch::Receiver<Snapshot>, StoreError> {
        self.check_online()?;
        let mut inner = self.inner.lock().unwrap();

        let initial = inner.snapshot(collection, owner);
        let key = (collection.to_string(), owner.clone());
        let tx = inner
            .watchers
            .entry(key)
            .or_insert_with(|| watch::channel(Snapshot::new()).0);
        tx.send_replace(initial);

        Ok(tx.subscribe())
    }

    async fn delete(&self, collection: &str, id: &RecordId) -> Result<(), StoreError> {
        self.check_online()?;
        let mut inner = self.inner.lock().unwrap();

        let removed = inner
            .collections
            .get_mut(collection)
            .and_then(|records| records.remove(id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        inner.notify(collection, &removed.user_id);
        Ok(())
    }
}
