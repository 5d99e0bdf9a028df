//! Measurement decoding errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeasurementError {
    #[error("measurement document is not valid JSON: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    #[error("timestamp {0:?} is not a valid RFC 3339 datetime")]
    InvalidTimestamp(String),

    #[error("timestamp {0} overflows nanosecond precision")]
    TimestampOutOfRange(i64),
}
