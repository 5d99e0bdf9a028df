//! InfluxDB v2 write sink
//!
//! One sink instance lives for a single measurement cycle: the HTTP session
//! is acquired fresh per cycle and dropped with the sink on every exit path,
//! including a failed write.

use crate::config::DatabaseConfig;
use anyhow::{bail, Context, Result};
use measurement::{encode_batch, Record};
use tracing::{debug, info};

pub struct InfluxSink {
    client: reqwest::Client,
    base_url: String,
    token: String,
    org: String,
    bucket: String,
}

impl InfluxSink {
    pub fn new(config: &DatabaseConfig) -> Result<Self> {
        // No request timeout: a stalled backend stalls the cycle, and the
        // scheduler never overlaps cycles
        let client = reqwest::Client::builder()
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: format!("http://{}:{}", config.address, config.port),
            token: config.token.clone(),
            org: config.org.clone(),
            bucket: config.bucket.clone(),
        })
    }

    /// Liveness probe against the backend's ping endpoint.
    pub async fn check_ready(&self) -> Result<()> {
        let response = self
            .client
            .get(format!("{}/ping", self.base_url))
            .send()
            .await
            .with_context(|| format!("failed to reach InfluxDB at {}", self.base_url))?;

        if !response.status().is_success() {
            bail!(
                "InfluxDB at {} is not ready: {}",
                self.base_url,
                response.status()
            );
        }

        info!("InfluxDB ready at {}", self.base_url);
        Ok(())
    }

    /// Write a batch of records in a single attempt. The whole batch goes in
    /// one request body, so it lands completely or not at all.
    pub async fn write(&self, records: &[Record]) -> Result<()> {
        let body = encode_batch(records)?;
        debug!("Writing {} records:\n{}", records.len(), body);

        let response = self
            .client
            .post(format!("{}/api/v2/write", self.base_url))
            .query(&[
                ("org", self.org.as_str()),
                ("bucket", self.bucket.as_str()),
                ("precision", "ns"),
            ])
            .header("Authorization", format!("Token {}", self.token))
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(body)
            .send()
            .await
            .context("failed to send write request")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("InfluxDB rejected write: {} {}", status, detail.trim());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> DatabaseConfig {
        DatabaseConfig {
            address: "db.example".to_string(),
            port: 9086,
            token: "token".to_string(),
            org: "org".to_string(),
            bucket: "bucket".to_string(),
        }
    }

    #[test]
    fn test_base_url_formatting() {
        let sink = InfluxSink::new(&test_config()).unwrap();
        assert_eq!(sink.base_url, "http://db.example:9086");
    }
}
