//! Error types for slot-engine operations.
//!
//! Only caller mistakes are errors. "No conflicts" and "no free slot left
//! today" are ordinary results and never surface here.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// An interval whose end is not strictly after its start.
    #[error("Invalid interval: end {end} must be after start {start}")]
    InvalidInterval { start: String, end: String },

    #[error("Invalid duration: {0} minutes (must be positive)")]
    InvalidDuration(i64),

    #[error("Invalid day length: {0} minutes (must be between 1 and 1440)")]
    InvalidDayLength(u32),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime '{input}': {reason}")]
    InvalidDateTime { input: String, reason: String },

    /// An event or draft that fails field validation (e.g. a too-short title).
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
