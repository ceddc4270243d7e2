//! Application façade
//!
//! Ties the identity provider, remote store, and capture pipeline
//! together the way the UI uses them: capture is gated on an active
//! session, the gallery is opened for whoever is signed in, and every
//! failure maps to one user-facing notification while prior state is
//! left unchanged.

use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::capture::{CaptureOutcome, CapturePipeline, Constraints};
use crate::error::{AuthError, CaptureError, StoreError};
use crate::gallery::Gallery;
use crate::state::session::{Session, SessionTracker};
use crate::store::{RecordId, RemoteStore, IMAGES_COLLECTION};

/// The photo app core, minus rendering.
pub struct GalleryApp {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn RemoteStore>,
    pipeline: CapturePipeline,
    sessions: SessionTracker,
}

impl GalleryApp {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn RemoteStore>,
        constraints: Constraints,
    ) -> Self {
        let sessions = SessionTracker::new(provider.sessions());
        let pipeline = CapturePipeline::new(store.clone(), constraints);
        GalleryApp { provider, store, pipeline, sessions }
    }

    /// The session active right now, refreshed by the provider's
    /// subscription. Handed into calls explicitly; nothing here reads
    /// ambient global state.
    pub fn current_session(&self) -> Option<Session> {
        self.sessions.current()
    }

    /// A tracker the view layer can await login/logout transitions on.
    pub fn session_tracker(&self) -> SessionTracker {
        SessionTracker::new(self.provider.sessions())
    }

    /// Header label for the signed-in user, or None when signed out.
    pub fn user_display(&self) -> Option<String> {
        self.sessions.current().map(|s| format!("Logged in as: {}", s.email))
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.provider.sign_up(email, password).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.provider.sign_in(email, password).await
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.provider.sign_out().await
    }

    /// Normalize and upload one photo for the current session.
    ///
    /// Fails with `AuthError::NotSignedIn` when nobody is logged in;
    /// nothing reaches the store on any failure.
    pub async fn capture_photo(&self, raw: Vec<u8>) -> Result<CaptureOutcome, CaptureError> {
        let session = self.sessions.current().ok_or(AuthError::NotSignedIn)?;
        self.pipeline.capture(&session, raw).await
    }

    /// Sequenced variant for callers that may abandon a capture: begin
    /// a ticket per selection and finish whichever ones complete; only
    /// the latest may store.
    pub fn capture_pipeline(&self) -> &CapturePipeline {
        &self.pipeline
    }

    /// Open the gallery for the current session.
    pub async fn open_gallery(&self) -> Result<Gallery, CaptureError> {
        let session = self.sessions.current().ok_or(AuthError::NotSignedIn)?;
        Gallery::open(self.store.as_ref(), session.user_id)
            .await
            .map_err(CaptureError::from)
    }

    /// Delete one stored photo. The view keeps its card until this
    /// confirms.
    pub async fn delete_photo(&self, id: &RecordId) -> Result<(), StoreError> {
        self.store.delete(IMAGES_COLLECTION, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryIdentityProvider;
    use crate::store::MemoryStore;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = RgbImage::from_pixel(1600, 1200, image::Rgb([200, 100, 50]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn app_with_store() -> (GalleryApp, Arc<MemoryStore>) {
        let provider = Arc::new(MemoryIdentityProvider::new());
        let store = Arc::new(MemoryStore::new());
        let app = GalleryApp::new(provider, store.clone(), Constraints::default());
        (app, store)
    }

    #[tokio::test]
    async fn test_capture_requires_login() {
        let (app, store) = app_with_store();
        let err = app.capture_photo(png_bytes()).await.unwrap_err();
        assert_eq!(err.user_message(), "Please log in first");
        assert_eq!(store.record_count(IMAGES_COLLECTION), 0);
    }

    #[tokio::test]
    async fn test_capture_and_gallery_end_to_end() {
        let (app, _store) = app_with_store();
        app.sign_up("a@b.com", "secret1").await.unwrap();
        assert_eq!(app.user_display().unwrap(), "Logged in as: a@b.com");

        app.capture_photo(png_bytes()).await.unwrap();

        let gallery = app.open_gallery().await.unwrap();
        let cards = gallery.cards();
        assert_eq!(cards.len(), 1);
        assert!(cards[0].download_name.starts_with("IMG_"));

        app.delete_photo(&cards[0].id).await.unwrap();
        let gallery = app.open_gallery().await.unwrap();
        assert!(gallery.cards().is_empty());
    }

    #[tokio::test]
    async fn test_records_belong_to_session_at_creation_time() {
        let (app, store) = app_with_store();
        let alice = app.sign_up("alice@b.com", "secret1").await.unwrap();
        app.capture_photo(png_bytes()).await.unwrap();

        app.sign_out().await.unwrap();
        let bob = app.sign_up("bob@b.com", "secret1").await.unwrap();
        app.capture_photo(png_bytes()).await.unwrap();

        // Bob's gallery shows only Bob's record
        let gallery = app.open_gallery().await.unwrap();
        assert_eq!(gallery.owner(), &bob.user_id);
        assert_eq!(gallery.cards().len(), 1);

        // Both records exist, each under its creator's identity
        assert_eq!(store.record_count(IMAGES_COLLECTION), 2);
        let rx = store.query_by_owner(IMAGES_COLLECTION, &alice.user_id).await.unwrap();
        assert_eq!(rx.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_gallery_is_refused_after_sign_out() {
        let (app, _store) = app_with_store();
        app.sign_up("a@b.com", "secret1").await.unwrap();
        app.capture_photo(png_bytes()).await.unwrap();
        app.sign_out().await.unwrap();

        let err = app.open_gallery().await.unwrap_err();
        assert!(matches!(err, CaptureError::Auth(AuthError::NotSignedIn)));
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_single_notification() {
        let (app, store) = app_with_store();
        app.sign_up("a@b.com", "secret1").await.unwrap();

        store.set_offline(true);
        let err = app.capture_photo(png_bytes()).await.unwrap_err();
        assert_eq!(err.user_message(), "Error saving image. Please try again.");
        store.set_offline(false);
        assert_eq!(store.record_count(IMAGES_COLLECTION), 0);
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_record_in_place() {
        let (app, store) = app_with_store();
        app.sign_up("a@b.com", "secret1").await.unwrap();
        app.capture_photo(png_bytes()).await.unwrap();
        let cards = app.open_gallery().await.unwrap().cards();

        store.set_offline(true);
        assert!(app.delete_photo(&cards[0].id).await.is_err());
        store.set_offline(false);

        assert_eq!(store.record_count(IMAGES_COLLECTION), 1);
    }
}
