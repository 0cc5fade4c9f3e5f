//! Error handling
//!
//! Defines error types and handling for the storage sample.

pub mod handlers;
pub mod types;

pub use types::*;
