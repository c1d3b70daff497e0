//! Audit trail - appends access decision events to file
//!
//! Events are written in JSONL format (one JSON object per line) to the
//! file specified in config. Writes are best-effort: a failure is reported
//! on the diagnostic channel and never propagates to the decision
//! pipeline, so audit trouble can never gate access.

use crate::domain::types::AuditEvent;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::{debug, error, info};

/// Append-only writer for audit events
pub struct AuditLog {
    file_path: String,
}

impl AuditLog {
    pub fn new(file_path: &str) -> Self {
        info!(file_path = %file_path, "audit_log_initialized");
        Self { file_path: file_path.to_string() }
    }

    /// Record an audit event.
    /// Returns true if the durable append succeeded, false otherwise;
    /// callers may ignore the result.
    pub fn record(&self, event: &AuditEvent) -> bool {
        let json = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "audit_serialize_failed");
                return false;
            }
        };

        match self.append_line(&json) {
            Ok(()) => {
                debug!(
                    level = %event.level.as_str(),
                    source = %event.source,
                    "audit_recorded"
                );
                true
            }
            Err(e) => {
                error!(
                    level = %event.level.as_str(),
                    source = %event.source,
                    error = %e,
                    "audit_write_failed"
                );
                false
            }
        }
    }

    /// Append a line to the audit file
    fn append_line(&self, line: &str) -> std::io::Result<()> {
        let path = Path::new(&self.file_path);

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        writeln!(file, "{}", line)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{AuditLevel, AuditEvent};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_audit_new() {
        let audit = AuditLog::new("audit.jsonl");
        assert_eq!(audit.file_path, "audit.jsonl");
    }

    #[test]
    fn test_record_event() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("audit.jsonl");
        let audit = AuditLog::new(file_path.to_str().unwrap());

        let event = AuditEvent::new(
            AuditLevel::Granted,
            "GateAccess",
            "access granted: B1234C0 matches B1234CD (distance 1)".to_string(),
        )
        .with_actor("unit 12");

        assert!(audit.record(&event));

        let content = fs::read_to_string(&file_path).unwrap();
        assert!(content.ends_with('\n'));

        let parsed: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(parsed["level"], "GRANTED");
        assert_eq!(parsed["source"], "GateAccess");
        assert_eq!(parsed["actor_id"], "unit 12");
    }

    #[test]
    fn test_append_mode() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("audit.jsonl");

        // Pre-create file with existing content
        fs::write(&file_path, "{\"existing\":\"data\"}\n").unwrap();

        let audit = AuditLog::new(file_path.to_str().unwrap());
        let event = AuditEvent::new(AuditLevel::Info, "GateServo", "gate cycle complete".to_string());
        audit.record(&event);

        let content = fs::read_to_string(&file_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("existing"));
        assert!(lines[1].contains("gate cycle complete"));
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("logs").join("gate").join("audit.jsonl");
        let audit = AuditLog::new(nested.to_str().unwrap());

        let event = AuditEvent::new(AuditLevel::Denied, "GateAccess", "denied".to_string());
        assert!(audit.record(&event));
        assert!(nested.exists());
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        // A directory path cannot be opened for append; record must report
        // failure without panicking or propagating
        let dir = tempdir().unwrap();
        let audit = AuditLog::new(dir.path().to_str().unwrap());

        let event = AuditEvent::new(AuditLevel::Error, "AuthStore", "unreachable".to_string());
        assert!(!audit.record(&event));
    }
}
