//! plate-gate - license-plate controlled gate access
//!
//! One invocation runs one decision cycle: capture a recognition result,
//! normalize and validate the plate, match it against the allowed list,
//! and on a positive match drive the gate through open/hold/close.
//!
//! Module structure:
//! - `domain/` - Core business types (AccessDecision, GateState, AuditEvent)
//! - `io/` - External interfaces (recognizer, store, audit trail, actuator)
//! - `services/` - Business logic (plate, matcher, gate, orchestrator)
//! - `infra/` - Infrastructure (config)

use clap::Parser;
use plate_gate::infra::Config;
use plate_gate::io::{AuditLog, CommandRecognizer, JsonFileStore, PlateSource, SerialActuator};
use plate_gate::services::{AccessOrchestrator, GateController};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// plate-gate - automated license-plate gate access
#[derive(Parser, Debug)]
#[command(name = "plate-gate", version, about)]
struct Args {
    /// Path to TOML configuration file (defaults to $CONFIG_FILE or
    /// config/dev.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Bypass the recognition pipeline with a fixed raw plate string
    #[arg(long)]
    plate: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize structured logging with configurable level via RUST_LOG env var
    // Default: INFO, use RUST_LOG=debug for full event visibility
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    info!(git_hash = env!("GIT_HASH"), "plate-gate starting");

    let args = Args::parse();
    let config_path = args
        .config
        .unwrap_or_else(|| Config::resolve_config_path(&std::env::args().collect::<Vec<_>>()));
    let config = Config::load_from_path(&config_path);

    info!(
        config_file = %config.config_file(),
        site_id = %config.site_id(),
        plates_path = %config.plates_path(),
        audit_file = %config.audit_file(),
        actuator_device = %config.actuator_device(),
        tolerance = %config.tolerance(),
        settle_ms = %config.settle_ms(),
        dwell_ms = %config.dwell_ms(),
        "config_loaded"
    );

    // One recognition result per invocation: either the --plate override
    // or the external pipeline's output
    let raw = match args.plate {
        Some(plate) => Some(plate),
        None => {
            let mut recognizer = CommandRecognizer::new(&config);
            match recognizer.capture().await {
                Ok(raw) => raw,
                Err(e) => {
                    // A failed pipeline run and "no detection" are handled
                    // the same way downstream: no plate to decide on
                    error!(error = %e, "recognizer_failed");
                    None
                }
            }
        }
    };

    let store = JsonFileStore::new(config.plates_path());
    let audit = AuditLog::new(config.audit_file());
    let actuator = SerialActuator::new(config.actuator_device(), config.actuator_baud());
    let gate = GateController::new(&config, Box::new(actuator));

    let mut orchestrator = AccessOrchestrator::new(&config, Box::new(store), audit, gate);
    let decision = orchestrator.decide(raw.as_deref()).await;

    info!(
        decision_id = %decision.id,
        outcome = %decision.outcome.as_str(),
        plate = %decision.subject,
        reason = %decision.reason,
        "decision_complete"
    );

    ExitCode::from(decision.exit_code())
}
