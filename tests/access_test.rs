//! End-to-end decision cycle tests over real files and a mock actuator

use plate_gate::domain::types::{AccessOutcome, GateState};
use plate_gate::infra::Config;
use plate_gate::io::actuator::{ActuatorCommand, MockActuator};
use plate_gate::io::{AuditLog, JsonFileStore};
use plate_gate::services::{AccessOrchestrator, GateController};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct Harness {
    orchestrator: AccessOrchestrator,
    commands: std::sync::Arc<parking_lot::Mutex<Vec<ActuatorCommand>>>,
    audit_path: PathBuf,
    _dir: TempDir,
}

/// Build a full pipeline over scratch files, with fast gate timings
fn harness(plates_json: &str) -> Harness {
    let dir = tempfile::tempdir().unwrap();

    let plates_path = dir.path().join("allowed_plates.json");
    fs::write(&plates_path, plates_json).unwrap();

    let audit_path = dir.path().join("audit.jsonl");
    let config_path = dir.path().join("gate.toml");
    fs::write(
        &config_path,
        format!(
            r#"
[plates]
path = "{}"
tolerance = 1

[audit]
file = "{}"

[gate]
settle_ms = 1
dwell_ms = 1
"#,
            plates_path.display(),
            audit_path.display()
        ),
    )
    .unwrap();

    let config = Config::from_file(&config_path).unwrap();

    let mock = MockActuator::new();
    let commands = mock.command_log();
    let gate = GateController::new(&config, Box::new(mock));
    let store = JsonFileStore::new(config.plates_path());
    let audit = AuditLog::new(config.audit_file());
    let orchestrator = AccessOrchestrator::new(&config, Box::new(store), audit, gate);

    Harness { orchestrator, commands, audit_path, _dir: dir }
}

fn audit_levels(harness: &Harness) -> Vec<String> {
    let content = fs::read_to_string(&harness.audit_path).unwrap_or_default();
    content
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            value["level"].as_str().unwrap().to_string()
        })
        .collect()
}

const PLATES: &str = r#"[
    {"code": "B1234CD", "owner": "unit 12", "active": true},
    {"code": "KB2492YT", "owner": "unit 7", "active": false}
]"#;

#[tokio::test]
async fn test_granted_cycle_end_to_end() {
    let mut h = harness(PLATES);

    let decision = h.orchestrator.decide(Some("b_1234 c0")).await;

    assert_eq!(decision.outcome, AccessOutcome::Granted);
    assert_eq!(decision.subject.as_str(), "B1234C0");
    assert_eq!(decision.matched.as_ref().unwrap().code, "B1234CD");
    assert_eq!(decision.distance, Some(1));
    assert_eq!(decision.exit_code(), 0);
    assert_eq!(h.orchestrator.gate_state(), GateState::Closed);

    assert_eq!(
        h.commands.lock().as_slice(),
        &[
            ActuatorCommand::SetPosition(90),
            ActuatorCommand::SetPosition(0),
            ActuatorCommand::Release,
        ]
    );

    assert_eq!(audit_levels(&h), vec!["GRANTED", "INFO"]);
}

#[tokio::test]
async fn test_denied_plate_leaves_gate_untouched() {
    let mut h = harness(PLATES);

    let decision = h.orchestrator.decide(Some("X9999ZZ")).await;

    assert_eq!(decision.outcome, AccessOutcome::Denied);
    assert_eq!(decision.exit_code(), 0);
    assert!(h.commands.lock().is_empty());
    assert_eq!(audit_levels(&h), vec!["DENIED"]);
}

#[tokio::test]
async fn test_non_canonical_store_record_still_matches() {
    // Codes entered with separators or lowercase are canonicalized on
    // load, exactly like the recognized plate itself
    let mut h = harness(r#"[{"code": "b 1234_cd", "owner": "unit 12", "active": true}]"#);

    let decision = h.orchestrator.decide(Some("B1234CD")).await;

    assert_eq!(decision.outcome, AccessOutcome::Granted);
    assert_eq!(decision.matched.as_ref().unwrap().code, "B1234CD");
    assert_eq!(decision.distance, Some(0));
}

#[tokio::test]
async fn test_inactive_plate_is_denied() {
    let mut h = harness(PLATES);

    let decision = h.orchestrator.decide(Some("KB2492YT")).await;

    assert_eq!(decision.outcome, AccessOutcome::Denied);
    assert!(h.commands.lock().is_empty());
}

#[tokio::test]
async fn test_garbage_read_is_rejected_before_matching() {
    let mut h = harness(PLATES);

    let decision = h.orchestrator.decide(Some("12")).await;

    assert_eq!(decision.outcome, AccessOutcome::Denied);
    assert_eq!(decision.reason, "invalid plate format: 12");
    assert_eq!(decision.exit_code(), 1);
    assert!(h.commands.lock().is_empty());
}

#[tokio::test]
async fn test_empty_store_fails_closed() {
    let mut h = harness("[]");

    let decision = h.orchestrator.decide(Some("B1234CD")).await;

    assert_eq!(decision.outcome, AccessOutcome::Error);
    assert_eq!(decision.exit_code(), 1);
    assert_eq!(h.orchestrator.gate_state(), GateState::Closed);
    assert!(h.commands.lock().is_empty());
    assert_eq!(audit_levels(&h), vec!["ERROR"]);
}

#[tokio::test]
async fn test_unreadable_store_fails_closed() {
    let mut h = harness(PLATES);
    // Corrupt the store after setup
    fs::write(h._dir.path().join("allowed_plates.json"), "{broken").unwrap();

    let decision = h.orchestrator.decide(Some("B1234CD")).await;

    assert_eq!(decision.outcome, AccessOutcome::Error);
    assert_eq!(h.orchestrator.gate_state(), GateState::Closed);
    assert!(h.commands.lock().is_empty());
    assert_eq!(audit_levels(&h), vec!["ERROR"]);
}

#[tokio::test]
async fn test_consecutive_decisions_share_one_gate() {
    let mut h = harness(PLATES);

    let first = h.orchestrator.decide(Some("B1234CD")).await;
    assert_eq!(first.outcome, AccessOutcome::Granted);

    let second = h.orchestrator.decide(Some("X9999ZZ")).await;
    assert_eq!(second.outcome, AccessOutcome::Denied);

    // Gate returned to rest and only cycled once
    assert_eq!(h.orchestrator.gate_state(), GateState::Closed);
    let commands = h.commands.lock();
    assert_eq!(
        commands.iter().filter(|c| **c == ActuatorCommand::Release).count(),
        1
    );
}
