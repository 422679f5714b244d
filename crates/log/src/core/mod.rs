//! Core types shared by every stage of logger assembly.
//!
//! ### [`error`] - Error handling
//! [`LogError`] covers the four ways assembly can fail (reading, decoding,
//! validating, building) and [`LogResult`] is the crate-wide result alias.

pub mod error;

pub use error::{LogError, LogResult};
