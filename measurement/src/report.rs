//! Speedtest report decoding
//!
//! Decodes the JSON document produced by `speedtest -f json` and maps it to
//! the four time-series records the dashboards expect. The mapping is fixed:
//! renaming a measurement or a field breaks every existing query.

use crate::error::MeasurementError;
use crate::record::{FieldValue, Record, Timestamp};
use serde::Deserialize;
use serde_json::Number;

#[derive(Debug, Clone, Deserialize)]
pub struct SpeedtestReport {
    pub timestamp: Timestamp,
    pub ping: PingStats,
    pub download: TransferStats,
    pub upload: TransferStats,
    /// Absent when the tool could not measure loss; treated as 0.0.
    #[serde(rename = "packetLoss")]
    pub packet_loss: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PingStats {
    pub jitter: f64,
    pub latency: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferStats {
    pub bandwidth: Number,
    pub bytes: Number,
    pub elapsed: Number,
    pub latency: LoadedLatency,
}

/// Latency under load, nested inside the download/upload branches.
#[derive(Debug, Clone, Deserialize)]
pub struct LoadedLatency {
    pub high: f64,
    pub low: f64,
    pub jitter: f64,
}

impl SpeedtestReport {
    pub fn parse(json: &str) -> Result<Self, MeasurementError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Produce the four records of one cycle, all sharing the report
    /// timestamp: ping, download, upload, packetLoss.
    pub fn to_records(&self) -> Vec<Record> {
        vec![
            Record {
                measurement: "ping",
                timestamp: self.timestamp.clone(),
                fields: vec![
                    ("jitter", FieldValue::Float(self.ping.jitter)),
                    ("latency", FieldValue::Float(self.ping.latency)),
                ],
            },
            transfer_record("download", &self.download, &self.timestamp),
            transfer_record("upload", &self.upload, &self.timestamp),
            Record {
                measurement: "packetLoss",
                timestamp: self.timestamp.clone(),
                fields: vec![(
                    "packetLoss",
                    FieldValue::Float(self.packet_loss.unwrap_or(0.0)),
                )],
            },
        ]
    }
}

fn transfer_record(
    measurement: &'static str,
    stats: &TransferStats,
    timestamp: &Timestamp,
) -> Record {
    Record {
        measurement,
        timestamp: timestamp.clone(),
        fields: vec![
            // bandwidth, bytes and elapsed keep the width the tool reported
            ("bandwidth", FieldValue::from(&stats.bandwidth)),
            ("bytes", FieldValue::from(&stats.bytes)),
            ("elapsed", FieldValue::from(&stats.elapsed)),
            ("latency_high", FieldValue::Float(stats.latency.high)),
            ("latency_low", FieldValue::Float(stats.latency.low)),
            ("jitter", FieldValue::Float(stats.latency.jitter)),
        ],
    }
}

/// Decode a raw report and build its records in one step.
pub fn build_records(json: &str) -> Result<Vec<Record>, MeasurementError> {
    Ok(SpeedtestReport::parse(json)?.to_records())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn sample_document() -> Value {
        json!({
            "timestamp": 1000,
            "ping": { "jitter": 1.2, "latency": 20.5 },
            "download": {
                "bandwidth": 100,
                "bytes": 5000,
                "elapsed": 50,
                "latency": { "high": 30.0, "low": 10.0, "jitter": 2.0 }
            },
            "upload": {
                "bandwidth": 80,
                "bytes": 4000,
                "elapsed": 40,
                "latency": { "high": 25.0, "low": 8.0, "jitter": 1.5 }
            },
            "packetLoss": 0.5
        })
    }

    #[test]
    fn test_build_produces_four_records_with_shared_timestamp() {
        let records = build_records(&sample_document().to_string()).unwrap();

        assert_eq!(records.len(), 4);
        let names: Vec<_> = records.iter().map(|r| r.measurement).collect();
        assert_eq!(names, ["ping", "download", "upload", "packetLoss"]);

        for record in &records {
            assert_eq!(record.timestamp, Timestamp::Unix(1000));
        }
    }

    #[test]
    fn test_ping_fields() {
        let records = build_records(&sample_document().to_string()).unwrap();

        assert_eq!(
            records[0].fields,
            vec![
                ("jitter", FieldValue::Float(1.2)),
                ("latency", FieldValue::Float(20.5)),
            ]
        );
    }

    #[test]
    fn test_download_fields_preserve_integer_width() {
        let records = build_records(&sample_document().to_string()).unwrap();

        assert_eq!(
            records[1].fields,
            vec![
                ("bandwidth", FieldValue::Integer(100)),
                ("bytes", FieldValue::Integer(5000)),
                ("elapsed", FieldValue::Integer(50)),
                ("latency_high", FieldValue::Float(30.0)),
                ("latency_low", FieldValue::Float(10.0)),
                ("jitter", FieldValue::Float(2.0)),
            ]
        );
    }

    #[test]
    fn test_fractional_bandwidth_stays_float() {
        let mut document = sample_document();
        document["upload"]["bandwidth"] = json!(80.25);

        let records = build_records(&document.to_string()).unwrap();
        assert_eq!(records[2].fields[0], ("bandwidth", FieldValue::Float(80.25)));
    }

    #[test]
    fn test_packet_loss_passthrough() {
        let records = build_records(&sample_document().to_string()).unwrap();

        assert_eq!(
            records[3].fields,
            vec![("packetLoss", FieldValue::Float(0.5))]
        );
    }

    #[test]
    fn test_packet_loss_defaults_to_zero_when_absent() {
        let mut document = sample_document();
        document.as_object_mut().unwrap().remove("packetLoss");

        let records = build_records(&document.to_string()).unwrap();
        assert_eq!(
            records[3].fields,
            vec![("packetLoss", FieldValue::Float(0.0))]
        );
    }

    #[test]
    fn test_rfc3339_timestamp_kept_verbatim() {
        let mut document = sample_document();
        document["timestamp"] = json!("2024-03-01T12:00:00Z");

        let records = build_records(&document.to_string()).unwrap();
        assert_eq!(
            records[0].timestamp,
            Timestamp::Rfc3339("2024-03-01T12:00:00Z".to_string())
        );
    }

    #[test]
    fn test_missing_required_branch_fails() {
        let mut document = sample_document();
        document.as_object_mut().unwrap().remove("download");

        assert!(build_records(&document.to_string()).is_err());
    }

    #[test]
    fn test_missing_nested_latency_field_fails() {
        let mut document = sample_document();
        document["download"]["latency"]
            .as_object_mut()
            .unwrap()
            .remove("high");

        assert!(build_records(&document.to_string()).is_err());
    }

    #[test]
    fn test_invalid_json_fails() {
        assert!(build_records("Speedtest failed to connect").is_err());
    }
}
