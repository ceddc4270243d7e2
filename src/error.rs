//! Error types for capture, auth, and store operations
//!
//! Every failure here is recoverable at the call site that triggered it:
//! the UI shows a single notification and prior state is left untouched.
//! No partial record may reach the store when any of these is raised.

use thiserror::Error;

/// Failures of the image normalizer.
///
/// Both variants are terminal for the current capture attempt. There is
/// no retry: the caller surfaces a message and lets the user pick a
/// different photo.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The input bytes are not a recognizable image.
    #[error("could not decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// The compressed output still exceeds the configured byte ceiling.
    /// The normalizer rejects rather than re-compressing at a lower
    /// quality, so callers must pick constraints conservatively.
    #[error("encoded image is {size} bytes, ceiling is {limit}")]
    TooLarge { size: usize, limit: usize },

    /// The JPEG encoder itself failed on an already-decoded image.
    #[error("could not encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Credential and session failures from the identity provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No active session for an operation that requires one.
    #[error("no user is signed in")]
    NotSignedIn,

    /// Email/password pair rejected on sign-in.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Sign-up attempted with an email that already has an account.
    #[error("an account already exists for {0}")]
    EmailInUse(String),

    /// Password rejected by the provider's policy.
    #[error("password must be at least {min_len} characters")]
    WeakPassword { min_len: usize },

    /// Any other provider-side failure, carried as an opaque message.
    #[error("identity provider error: {0}")]
    Provider(String),
}

impl AuthError {
    /// Notification for a failed sign-in attempt.
    pub fn sign_in_message(&self) -> String {
        format!("Login error: {}", self)
    }

    /// Notification for a failed sign-up attempt.
    pub fn sign_up_message(&self) -> String {
        format!("Signup error: {}", self)
    }

    /// Notification for a failed sign-out.
    pub fn sign_out_message(&self) -> String {
        format!("Logout error: {}", self)
    }
}

/// Network or permission failures from the remote store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The record id does not exist in the collection.
    #[error("record {0} not found")]
    NotFound(String),

    /// The store refused the operation for the current identity.
    #[error("permission denied")]
    PermissionDenied,

    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Unified error for a full capture attempt (normalize + upload).
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The background normalization task panicked or was cancelled.
    #[error("capture task failed: {0}")]
    Task(String),
}

impl CaptureError {
    /// Single human-readable notification for a failed capture.
    pub fn user_message(&self) -> String {
        match self {
            CaptureError::Normalize(NormalizeError::Decode(_)) => {
                "Could not read that image. Please choose a different photo.".to_string()
            }
            CaptureError::Normalize(NormalizeError::TooLarge { .. }) => {
                "That photo is too big to upload. Please choose a smaller one.".to_string()
            }
            CaptureError::Normalize(NormalizeError::Encode(_)) | CaptureError::Task(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            CaptureError::Auth(AuthError::NotSignedIn) => "Please log in first".to_string(),
            // Sign-in and sign-up failures get their operation-specific
            // prefix at the call site; a stray auth error during
            // capture reads as a login problem.
            CaptureError::Auth(err) => err.sign_in_message(),
            CaptureError::Store(_) => "Error saving image. Please try again.".to_string(),
        }
    }
}
