//! External speedtest invocation

use anyhow::{Context, Result};
use std::process::ExitStatus;
use tokio::process::Command;
use tracing::debug;

/// Fixed arguments: machine-readable JSON output with the license and GDPR
/// prompts pre-accepted, so the tool never blocks on stdin.
const SPEEDTEST_ARGS: &[&str] = &["--accept-license", "--accept-gdpr", "-f", "json"];

/// Raw result of one speedtest run. A non-zero exit is carried here as a
/// normal, reportable outcome rather than an error.
#[derive(Debug)]
pub struct TestOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Run the speedtest binary to completion and capture both streams.
/// Errors only when the process cannot be spawned at all.
pub async fn run_speedtest() -> Result<TestOutput> {
    debug!("Launching speedtest {}", SPEEDTEST_ARGS.join(" "));

    let output = Command::new("speedtest")
        .args(SPEEDTEST_ARGS)
        .output()
        .await
        .context("failed to launch speedtest binary")?;

    Ok(TestOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
