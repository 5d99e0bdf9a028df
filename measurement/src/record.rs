//! Time-series record types and line-protocol encoding

use crate::error::MeasurementError;
use chrono::DateTime;
use serde::Deserialize;
use serde_json::Number;
use std::fmt;

/// A single field value, preserving the integer/float distinction of the
/// source document so integer fields reach the backend as integers.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Integer(i64),
}

impl From<&Number> for FieldValue {
    fn from(value: &Number) -> Self {
        if let Some(i) = value.as_i64() {
            FieldValue::Integer(i)
        } else {
            FieldValue::Float(value.as_f64().unwrap_or_default())
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Line protocol treats a bare number as a float
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Integer(v) => write!(f, "{}i", v),
        }
    }
}

/// The report timestamp, carried verbatim: a JSON number stays a unix
/// timestamp in seconds, a JSON string stays an RFC 3339 datetime.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Unix(i64),
    Rfc3339(String),
}

impl Timestamp {
    /// Convert to nanoseconds since the unix epoch for the wire format.
    pub fn as_nanos(&self) -> Result<i64, MeasurementError> {
        match self {
            Timestamp::Unix(secs) => secs
                .checked_mul(1_000_000_000)
                .ok_or(MeasurementError::TimestampOutOfRange(*secs)),
            Timestamp::Rfc3339(raw) => {
                let datetime = DateTime::parse_from_rfc3339(raw)
                    .map_err(|_| MeasurementError::InvalidTimestamp(raw.clone()))?;
                datetime
                    .timestamp_nanos_opt()
                    .ok_or(MeasurementError::TimestampOutOfRange(datetime.timestamp()))
            }
        }
    }
}

/// One time-series point destined for the backend.
///
/// Measurement and field names are fixed by the report mapping, so they are
/// static; only the values and the timestamp vary per cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub measurement: &'static str,
    pub timestamp: Timestamp,
    pub fields: Vec<(&'static str, FieldValue)>,
}

impl Record {
    /// Render as one line of InfluxDB line protocol with an ns timestamp.
    pub fn to_line(&self) -> Result<String, MeasurementError> {
        let fields = self
            .fields
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join(",");

        Ok(format!(
            "{} {} {}",
            self.measurement,
            fields,
            self.timestamp.as_nanos()?
        ))
    }
}

/// Encode a batch of records as a single newline-separated write body.
pub fn encode_batch(records: &[Record]) -> Result<String, MeasurementError> {
    let lines = records
        .iter()
        .map(Record::to_line)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(lines.join("\n"))
}
