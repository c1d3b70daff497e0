//! Plate recognition input - subprocess glue around the OCR pipeline
//!
//! The recognition pipeline itself (detection + OCR over pixels) is an
//! external collaborator. It is invoked as a command whose stdout carries
//! a single result line prefixed with `PLATE_RESULT:`; everything else on
//! stdout is pipeline noise and is ignored. A missing result line means
//! "no plate detected".

use anyhow::Context;
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

use crate::infra::config::Config;

/// Source of one raw recognition result per invocation
#[async_trait]
pub trait PlateSource: Send {
    /// Returns the raw recognized plate string, or None when the pipeline
    /// ran but detected no plate. Errors mean the pipeline itself failed.
    async fn capture(&mut self) -> anyhow::Result<Option<String>>;
}

/// Runs the configured external recognition command and scans its stdout
pub struct CommandRecognizer {
    command: String,
    args: Vec<String>,
    result_prefix: String,
    timeout: Duration,
}

impl CommandRecognizer {
    pub fn new(config: &Config) -> Self {
        Self {
            command: config.recognizer_command().to_string(),
            args: config.recognizer_args().to_vec(),
            result_prefix: config.recognizer_result_prefix().to_string(),
            timeout: Duration::from_millis(config.recognizer_timeout_ms()),
        }
    }
}

/// Extract the plate from recognizer stdout.
/// Takes the first line starting with `prefix`; the remainder is trimmed.
/// An empty remainder counts as no detection.
pub fn parse_result(stdout: &str, prefix: &str) -> Option<String> {
    stdout
        .lines()
        .find_map(|line| line.strip_prefix(prefix))
        .map(|rest| rest.trim().to_string())
        .filter(|plate| !plate.is_empty())
}

#[async_trait]
impl PlateSource for CommandRecognizer {
    async fn capture(&mut self) -> anyhow::Result<Option<String>> {
        info!(command = %self.command, args = ?self.args, "recognizer_started");

        let output = tokio::time::timeout(
            self.timeout,
            Command::new(&self.command).args(&self.args).output(),
        )
        .await
        .with_context(|| format!("Recognizer command {} timed out", self.command))?
        .with_context(|| format!("Failed to run recognizer command {}", self.command))?;

        if !output.status.success() {
            anyhow::bail!(
                "recognizer command {} exited with status {}",
                self.command,
                output.status
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let plate = parse_result(&stdout, &self.result_prefix);
        debug!(detected = %plate.is_some(), "recognizer_finished");
        Ok(plate)
    }
}
