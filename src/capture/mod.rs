//! Capture module
//!
//! This module turns a user-selected image into a stored record:
//! - Pure resize/compress normalization (normalizer.rs)
//! - The sequenced capture pipeline that uploads the result (pipeline.rs)

pub mod normalizer;
pub mod pipeline;

pub use normalizer::{normalize, Constraints};
pub use pipeline::{CaptureOutcome, CapturePipeline, CaptureTicket};
