//! snapgrid: photo capture and per-user gallery core
//!
//! The one algorithmic piece is the image normalizer
//! ([`capture::normalize`]): decode a user-selected image, downscale it
//! to a longest-edge ceiling without ever upscaling, JPEG-encode it,
//! and reject output that still exceeds a byte ceiling. Everything
//! around it is glue over external collaborators: an identity provider
//! ([`auth::IdentityProvider`]), a remote realtime store
//! ([`store::RemoteStore`]), and a renderer that consumes
//! [`gallery::GalleryCard`]s.
//!
//! Capture attempts are tagged with monotonically increasing sequence
//! numbers so an abandoned capture can finish harmlessly: only the
//! latest attempt's result is ever stored.

pub mod app;
pub mod auth;
pub mod capture;
pub mod error;
pub mod gallery;
pub mod state;
pub mod store;

pub use app::GalleryApp;
pub use capture::{normalize, CaptureOutcome, CapturePipeline, Constraints};
pub use error::{AuthError, CaptureError, NormalizeError, StoreError};
pub use gallery::{Gallery, GalleryCard};
pub use state::data::{ImageRecord, UserId};
pub use state::session::{Session, SessionTracker};
pub use store::{RecordId, RemoteStore};
