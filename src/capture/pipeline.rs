//! Sequenced capture pipeline
//!
//! Runs the normalizer off the async thread and uploads the result as
//! an `ImageRecord`. Every attempt carries a monotonically increasing
//! sequence number; when the user starts a new capture before the
//! previous one finishes, the stale result is discarded and never
//! reaches the store. Capture timestamps are likewise forced to be
//! strictly increasing even when the clock stalls.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task;

use crate::capture::normalizer::{normalize, Constraints};
use crate::error::CaptureError;
use crate::state::data::ImageRecord;
use crate::state::session::Session;
use crate::store::{RecordId, RemoteStore, IMAGES_COLLECTION};

/// Tag for one in-flight capture attempt. Obtained from `begin` and
/// consumed by `finish`; only the most recently issued ticket may
/// store a record.
#[derive(Debug)]
pub struct CaptureTicket {
    seq: u64,
}

impl CaptureTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// What became of one capture attempt.
#[derive(Debug)]
pub enum CaptureOutcome {
    /// The normalized image was uploaded under this record id.
    Stored { id: RecordId, seq: u64 },
    /// A newer capture started first; this result was discarded
    /// without touching the store.
    Superseded { seq: u64 },
}

/// Normalize-and-upload pipeline shared by all captures.
pub struct CapturePipeline {
    store: Arc<dyn RemoteStore>,
    constraints: Constraints,
    latest_seq: AtomicU64,
    last_timestamp: AtomicI64,
}

impl CapturePipeline {
    pub fn new(store: Arc<dyn RemoteStore>, constraints: Constraints) -> Self {
        CapturePipeline {
            store,
            constraints,
            latest_seq: AtomicU64::new(0),
            last_timestamp: AtomicI64::new(0),
        }
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Start a capture attempt, superseding any attempt still in flight.
    pub fn begin(&self) -> CaptureTicket {
        CaptureTicket { seq: self.latest_seq.fetch_add(1, Ordering::SeqCst) + 1 }
    }

    /// Normalize `raw` and, if this ticket is still the latest, store
    /// the result under the given session's identity.
    ///
    /// Normalization runs on the blocking pool since codec work is
    /// CPU-bound.
    pub async fn finish(
        &self,
        ticket: CaptureTicket,
        session: &Session,
        raw: Vec<u8>,
    ) -> Result<CaptureOutcome, CaptureError> {
        let constraints = self.constraints;
        let encoded = task::spawn_blocking(move || normalize(&raw, &constraints))
            .await
            .map_err(|e| CaptureError::Task(e.to_string()))??;

        // A newer attempt started while we were encoding; drop this one.
        if self.latest_seq.load(Ordering::SeqCst) != ticket.seq {
            return Ok(CaptureOutcome::Superseded { seq: ticket.seq });
        }

        let record =
            ImageRecord::new(&encoded, session.user_id.clone(), self.next_timestamp());
        let id = self.store.insert(IMAGES_COLLECTION, record).await?;

        Ok(CaptureOutcome::Stored { id, seq: ticket.seq })
    }

    /// Convenience wrapper: begin and finish in one call.
    pub async fn capture(
        &self,
        session: &Session,
        raw: Vec<u8>,
    ) -> Result<CaptureOutcome, CaptureError> {
        let ticket = self.begin();
        self.finish(ticket, session, raw).await
    }

    /// Wall-clock milliseconds, bumped past the previous capture's
    /// timestamp so records always order by creation.
    fn next_timestamp(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut last = self.last_timestamp.load(Ordering::SeqCst);
        loop {
            let next = now.max(last + 1);
            match self.last_timestamp.compare_exchange(
                last,
                next,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }
}
