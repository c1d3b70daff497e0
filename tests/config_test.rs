//! Integration tests for configuration loading

use plate_gate::infra::Config;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();

    let config_content = r#"
[site]
id = "test-gate"

[recognizer]
command = "/usr/bin/recognize"
args = ["--single-frame"]
result_prefix = "RESULT:"
timeout_ms = 10000

[plates]
path = "/var/lib/gate/plates.json"
tolerance = 2
min_prefix_letters = 2
max_prefix_letters = 2
min_digits = 3
max_digits = 3
min_suffix_letters = 2
max_suffix_letters = 2

[audit]
file = "/var/log/gate/audit.jsonl"

[actuator]
device = "/dev/ttyUSB0"
baud = 19200
open_angle = 85
closed_angle = -5

[gate]
settle_ms = 1500
dwell_ms = 8000
"#;

    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.site_id(), "test-gate");
    assert_eq!(config.recognizer_command(), "/usr/bin/recognize");
    assert_eq!(config.recognizer_args(), &["--single-frame".to_string()]);
    assert_eq!(config.recognizer_result_prefix(), "RESULT:");
    assert_eq!(config.recognizer_timeout_ms(), 10000);
    assert_eq!(config.plates_path(), "/var/lib/gate/plates.json");
    assert_eq!(config.tolerance(), 2);
    assert_eq!(config.min_prefix_letters(), 2);
    assert_eq!(config.max_digits(), 3);
    assert_eq!(config.audit_file(), "/var/log/gate/audit.jsonl");
    assert_eq!(config.actuator_device(), "/dev/ttyUSB0");
    assert_eq!(config.actuator_baud(), 19200);
    assert_eq!(config.open_angle(), 85);
    assert_eq!(config.closed_angle(), -5);
    assert_eq!(config.settle_ms(), 1500);
    assert_eq!(config.dwell_ms(), 8000);
}

#[test]
fn test_partial_config_falls_back_to_defaults() {
    let mut temp_file = NamedTempFile::new().unwrap();

    temp_file
        .write_all(
            br#"
[site]
id = "north-gate"

[gate]
dwell_ms = 3000
"#,
        )
        .unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.site_id(), "north-gate");
    assert_eq!(config.dwell_ms(), 3000);
    // Untouched sections keep their defaults
    assert_eq!(config.settle_ms(), 2000);
    assert_eq!(config.tolerance(), 1);
    assert_eq!(config.open_angle(), 90);
    assert_eq!(config.recognizer_result_prefix(), "PLATE_RESULT:");
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let config = Config::load_from_path("/nonexistent/path.toml");
    assert_eq!(config.site_id(), "plate-gate");
    assert_eq!(config.tolerance(), 1);
}

#[test]
fn test_malformed_file_is_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"not [valid toml").unwrap();
    temp_file.flush().unwrap();

    assert!(Config::from_file(temp_file.path()).is_err());
}
