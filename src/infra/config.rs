//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml

use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Unique gate identifier (e.g., "north-gate")
    #[serde(default = "default_site_id")]
    pub id: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self { id: default_site_id() }
    }
}

fn default_site_id() -> String {
    "plate-gate".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecognizerConfig {
    /// External recognition command to invoke
    #[serde(default = "default_recognizer_command")]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Stdout line prefix carrying the recognized plate
    #[serde(default = "default_result_prefix")]
    pub result_prefix: String,
    #[serde(default = "default_recognizer_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            command: default_recognizer_command(),
            args: Vec::new(),
            result_prefix: default_result_prefix(),
            timeout_ms: default_recognizer_timeout_ms(),
        }
    }
}

fn default_recognizer_command() -> String {
    "python3".to_string()
}

fn default_result_prefix() -> String {
    "PLATE_RESULT:".to_string()
}

fn default_recognizer_timeout_ms() -> u64 {
    30_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlatesConfig {
    /// Path to the allowed-plates JSON file
    #[serde(default = "default_plates_path")]
    pub path: String,
    /// Maximum Hamming distance forgiven when matching (single OCR misread)
    #[serde(default = "default_tolerance")]
    pub tolerance: u32,
    /// Plate grammar: letter-block, digit-block, letter-block bounds
    #[serde(default = "default_min_prefix_letters")]
    pub min_prefix_letters: usize,
    #[serde(default = "default_max_prefix_letters")]
    pub max_prefix_letters: usize,
    #[serde(default = "default_min_digits")]
    pub min_digits: usize,
    #[serde(default = "default_max_digits")]
    pub max_digits: usize,
    #[serde(default = "default_min_suffix_letters")]
    pub min_suffix_letters: usize,
    #[serde(default = "default_max_suffix_letters")]
    pub max_suffix_letters: usize,
}

impl Default for PlatesConfig {
    fn default() -> Self {
        Self {
            path: default_plates_path(),
            tolerance: default_tolerance(),
            min_prefix_letters: default_min_prefix_letters(),
            max_prefix_letters: default_max_prefix_letters(),
            min_digits: default_min_digits(),
            max_digits: default_max_digits(),
            min_suffix_letters: default_min_suffix_letters(),
            max_suffix_letters: default_max_suffix_letters(),
        }
    }
}

fn default_plates_path() -> String {
    "data/allowed_plates.json".to_string()
}

fn default_tolerance() -> u32 {
    1
}

fn default_min_prefix_letters() -> usize {
    1
}

fn default_max_prefix_letters() -> usize {
    2
}

fn default_min_digits() -> usize {
    1
}

fn default_max_digits() -> usize {
    4
}

fn default_min_suffix_letters() -> usize {
    1
}

fn default_max_suffix_letters() -> usize {
    3
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// File path for the audit trail (JSONL format)
    #[serde(default = "default_audit_file")]
    pub file: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self { file: default_audit_file() }
    }
}

fn default_audit_file() -> String {
    "audit.jsonl".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActuatorConfig {
    #[serde(default = "default_actuator_device")]
    pub device: String,
    #[serde(default = "default_actuator_baud")]
    pub baud: u32,
    /// Servo angle for the open position (degrees)
    #[serde(default = "default_open_angle")]
    pub open_angle: i16,
    /// Servo angle for the closed position (degrees)
    #[serde(default = "default_closed_angle")]
    pub closed_angle: i16,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            device: default_actuator_device(),
            baud: default_actuator_baud(),
            open_angle: default_open_angle(),
            closed_angle: default_closed_angle(),
        }
    }
}

fn default_actuator_device() -> String {
    "/dev/ttyAMA4".to_string()
}

fn default_actuator_baud() -> u32 {
    9600
}

fn default_open_angle() -> i16 {
    90
}

fn default_closed_angle() -> i16 {
    0
}

#[derive(Debug, Clone, Deserialize)]
pub struct GateConfig {
    /// Time to wait after a move command for the gate to settle (ms)
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    /// Time the gate is held open for the vehicle to pass (ms)
    #[serde(default = "default_dwell_ms")]
    pub dwell_ms: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self { settle_ms: default_settle_ms(), dwell_ms: default_dwell_ms() }
    }
}

fn default_settle_ms() -> u64 {
    2000
}

fn default_dwell_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub recognizer: RecognizerConfig,
    #[serde(default)]
    pub plates: PlatesConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub actuator: ActuatorConfig,
    #[serde(default)]
    pub gate: GateConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    site_id: String,
    recognizer_command: String,
    recognizer_args: Vec<String>,
    recognizer_result_prefix: String,
    recognizer_timeout_ms: u64,
    plates_path: String,
    tolerance: u32,
    min_prefix_letters: usize,
    max_prefix_letters: usize,
    min_digits: usize,
    max_digits: usize,
    min_suffix_letters: usize,
    max_suffix_letters: usize,
    audit_file: String,
    actuator_device: String,
    actuator_baud: u32,
    open_angle: i16,
    closed_angle: i16,
    settle_ms: u64,
    dwell_ms: u64,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default")
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, config_file: &str) -> Self {
        Self {
            site_id: toml_config.site.id,
            recognizer_command: toml_config.recognizer.command,
            recognizer_args: toml_config.recognizer.args,
            recognizer_result_prefix: toml_config.recognizer.result_prefix,
            recognizer_timeout_ms: toml_config.recognizer.timeout_ms,
            plates_path: toml_config.plates.path,
            tolerance: toml_config.plates.tolerance,
            min_prefix_letters: toml_config.plates.min_prefix_letters,
            max_prefix_letters: toml_config.plates.max_prefix_letters,
            min_digits: toml_config.plates.min_digits,
            max_digits: toml_config.plates.max_digits,
            min_suffix_letters: toml_config.plates.min_suffix_letters,
            max_suffix_letters: toml_config.plates.max_suffix_letters,
            audit_file: toml_config.audit.file,
            actuator_device: toml_config.actuator.device,
            actuator_baud: toml_config.actuator.baud,
            open_angle: toml_config.actuator.open_angle,
            closed_angle: toml_config.actuator.closed_angle,
            settle_ms: toml_config.gate.settle_ms,
            dwell_ms: toml_config.gate.dwell_ms,
            config_file: config_file.to_string(),
        }
    }

    /// Determine config file path from args or environment
    pub fn resolve_config_path(args: &[String]) -> String {
        for (i, arg) in args.iter().enumerate() {
            if arg == "--config" {
                if let Some(path) = args.get(i + 1) {
                    return path.clone();
                }
            }
            if let Some(path) = arg.strip_prefix("--config=") {
                return path.to_string();
            }
        }

        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }

        "config/dev.toml".to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self::from_toml(toml_config, &path.display().to_string()))
    }

    /// Load configuration - tries TOML file first, falls back to defaults
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    // Getters for all config fields
    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    pub fn recognizer_command(&self) -> &str {
        &self.recognizer_command
    }

    pub fn recognizer_args(&self) -> &[String] {
        &self.recognizer_args
    }

    pub fn recognizer_result_prefix(&self) -> &str {
        &self.recognizer_result_prefix
    }

    pub fn recognizer_timeout_ms(&self) -> u64 {
        self.recognizer_timeout_ms
    }

    pub fn plates_path(&self) -> &str {
        &self.plates_path
    }

    pub fn tolerance(&self) -> u32 {
        self.tolerance
    }

    pub fn min_prefix_letters(&self) -> usize {
        self.min_prefix_letters
    }

    pub fn max_prefix_letters(&self) -> usize {
        self.max_prefix_letters
    }

    pub fn min_digits(&self) -> usize {
        self.min_digits
    }

    pub fn max_digits(&self) -> usize {
        self.max_digits
    }

    pub fn min_suffix_letters(&self) -> usize {
        self.min_suffix_letters
    }

    pub fn max_suffix_letters(&self) -> usize {
        self.max_suffix_letters
    }

    pub fn audit_file(&self) -> &str {
        &self.audit_file
    }

    pub fn actuator_device(&self) -> &str {
        &self.actuator_device
    }

    pub fn actuator_baud(&self) -> u32 {
        self.actuator_baud
    }

    pub fn open_angle(&self) -> i16 {
        self.open_angle
    }

    pub fn closed_angle(&self) -> i16 {
        self.closed_angle
    }

    pub fn settle_ms(&self) -> u64 {
        self.settle_ms
    }

    pub fn dwell_ms(&self) -> u64 {
        self.dwell_ms
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Builder method for tests to shorten the settle wait
    #[cfg(test)]
    pub fn with_settle_ms(mut self, ms: u64) -> Self {
        self.settle_ms = ms;
        self
    }

    /// Builder method for tests to shorten the dwell wait
    #[cfg(test)]
    pub fn with_dwell_ms(mut self, ms: u64) -> Self {
        self.dwell_ms = ms;
        self
    }

    /// Builder method for tests to set the match tolerance
    #[cfg(test)]
    pub fn with_tolerance(mut self, tolerance: u32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Builder method for tests to point the audit trail at a scratch file
    #[cfg(test)]
    pub fn with_audit_file(mut self, path: &str) -> Self {
        self.audit_file = path.to_string();
        self
    }
}
