//! Speedpulse Measurement Library
//!
//! Shared data layer for the speedpulse agent: the decoded speedtest report,
//! typed time-series records, and their InfluxDB line-protocol encoding.

pub mod error;
pub mod record;
pub mod report;

pub use error::MeasurementError;
pub use record::{encode_batch, FieldValue, Record, Timestamp};
pub use report::{build_records, SpeedtestReport};
