//! Environment configuration

use crate::schedule::IntervalSpec;
use anyhow::{bail, Context, Result};

/// Runtime configuration, read from the environment once at startup.
/// Components receive a reference; nothing reads the environment afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub test_interval: IntervalSpec,
    pub run_once: bool,
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub address: String,
    pub port: u16,
    pub token: String,
    pub org: String,
    pub bucket: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port_raw = env_or("DB_PORT", "8086");
        let port: u16 = port_raw
            .parse()
            .with_context(|| format!("DB_PORT must be a port number, got {:?}", port_raw))?;

        let interval_raw = env_or("TEST_INTERVAL", "30m");
        let test_interval = IntervalSpec::parse(&interval_raw)
            .with_context(|| format!("invalid TEST_INTERVAL {:?}", interval_raw))?;

        let run_once_raw = env_or("RUN_ONCE", "false");
        let run_once = parse_bool(&run_once_raw)
            .with_context(|| format!("invalid RUN_ONCE {:?}", run_once_raw))?;

        Ok(Self {
            database: DatabaseConfig {
                address: env_or("DB_ADDRESS", "localhost"),
                port,
                token: env_or("DB_TOKEN", "MyTestAdminToken0=="),
                org: env_or("DB_ORG", "default"),
                bucket: env_or("DB_BUCKET", "default"),
            },
            test_interval,
            run_once,
            log_level: env_or("LOG_LEVEL", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Strict boolean parsing: exactly "true" or "false", case-insensitive.
fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => bail!("expected \"true\" or \"false\", got {:?}", other),
    }
}
