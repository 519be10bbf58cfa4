//! Core types shared across the updater.

pub mod error;

pub use error::{DepsError, ErrorCategory, ErrorContext, user_friendly_error};
