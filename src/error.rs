//! Error types for the traffic engine and the data loader.

use thiserror::Error;

/// Errors raised by the traffic pipeline and its configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrafficError {
    #[error("No trips data available for filtering")]
    NoTrips,
    #[error("Minute of day out of range: {0} (expected 0..=1439)")]
    MinuteOutOfRange(i64),
    #[error("Time filter out of range: {0} (expected -1 or 0..=1439)")]
    FilterOutOfRange(i64),
    #[error("Invalid time filter: {0:?}")]
    InvalidFilter(String),
    #[error("Window radius out of range: {0} (expected 1..=719 minutes)")]
    RadiusOutOfRange(u32),
}

/// Errors raised while decoding station and trip sources.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid timestamp {value:?} in trip {trip_id}")]
    Timestamp { trip_id: String, value: String },
}
