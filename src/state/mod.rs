//! State management module
//!
//! This module handles all application state, including:
//! - Shared data structures (data.rs)
//! - The session context and its watch subscription (session.rs)

pub mod data;
pub mod session;
