//! Access decision orchestration
//!
//! Drives one full decision cycle per invocation: normalize and validate
//! the recognized plate, load the authorization snapshot, match, and on a
//! positive match run the gate cycle. Every step lands in the audit trail;
//! every data-source or actuator uncertainty fails closed. Audit writes
//! are best-effort and never affect the decision.

use crate::domain::error::AccessError;
use crate::domain::types::{
    AccessDecision, AccessOutcome, AuditEvent, AuditLevel, CanonicalPlate, GateState,
};
use crate::infra::config::Config;
use crate::io::audit::AuditLog;
use crate::io::store::AuthorizationStore;
use crate::services::gate::GateController;
use crate::services::matcher::find_match;
use crate::services::plate::{normalize, PlateGrammar};
use std::time::Duration;
use tracing::{info, warn};

// Audit source names
const SOURCE_ACCESS: &str = "GateAccess";
const SOURCE_STORE: &str = "AuthStore";
const SOURCE_SERVO: &str = "GateServo";

/// Composes normalization, validation, matching, auditing and the gate
/// cycle into one decision per invocation
pub struct AccessOrchestrator {
    grammar: PlateGrammar,
    tolerance: u32,
    dwell: Duration,
    store: Box<dyn AuthorizationStore>,
    audit: AuditLog,
    gate: GateController,
}

impl AccessOrchestrator {
    pub fn new(
        config: &Config,
        store: Box<dyn AuthorizationStore>,
        audit: AuditLog,
        gate: GateController,
    ) -> Self {
        Self {
            grammar: PlateGrammar::new(config),
            tolerance: config.tolerance(),
            dwell: Duration::from_millis(config.dwell_ms()),
            store,
            audit,
            gate,
        }
    }

    /// Last commanded gate state
    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    /// Run one decision cycle over a raw recognition result.
    /// `None` means the recognition pipeline detected no plate.
    pub async fn decide(&mut self, raw: Option<&str>) -> AccessDecision {
        let Some(raw) = raw else {
            warn!("no_plate_detected");
            self.audit.record(&AuditEvent::new(
                AuditLevel::Error,
                SOURCE_ACCESS,
                "no plate result from recognizer".to_string(),
            ));
            return AccessDecision::error(
                CanonicalPlate(String::new()),
                AccessError::RecognitionMissing,
            );
        };

        let subject = normalize(raw);
        info!(raw = %raw, plate = %subject, "plate_recognized");

        if !self.grammar.is_valid(&subject) {
            let fault = AccessError::FormatInvalid(subject.as_str().to_string());
            let reason = fault.to_string();
            warn!(plate = %subject, "plate_format_invalid");
            self.audit.record(&AuditEvent::new(AuditLevel::Denied, SOURCE_ACCESS, reason.clone()));
            return AccessDecision::denied(subject, reason, Some(fault));
        }

        let records = match self.store.load_records().await {
            Ok(records) => records,
            Err(e) => {
                self.audit.record(&AuditEvent::new(
                    AuditLevel::Error,
                    SOURCE_STORE,
                    format!("failed to load allowed plates: {}", e),
                ));
                return AccessDecision::error(
                    subject,
                    AccessError::DataSourceUnavailable(e.to_string()),
                );
            }
        };

        if records.is_empty() {
            self.audit.record(&AuditEvent::new(
                AuditLevel::Error,
                SOURCE_STORE,
                "allowed plate list is empty".to_string(),
            ));
            return AccessDecision::error(subject, AccessError::DataSourceEmpty);
        }

        let Some(m) = find_match(&subject, &records, self.tolerance) else {
            let reason =
                format!("access denied: {} did not match any allowed plate", subject);
            info!(plate = %subject, "access_denied");
            self.audit.record(&AuditEvent::new(AuditLevel::Denied, SOURCE_ACCESS, reason.clone()));
            return AccessDecision::denied(subject, reason, None);
        };

        let decision = AccessDecision::granted(subject, m.record, m.distance);
        info!(
            plate = %decision.subject,
            matched = %decision.matched.as_ref().map(|r| r.code.as_str()).unwrap_or_default(),
            distance = %m.distance,
            "access_granted"
        );
        self.audit.record(
            &AuditEvent::new(AuditLevel::Granted, SOURCE_ACCESS, decision.reason.clone())
                .with_actor(&decision.matched.as_ref().map(|r| r.owner.clone()).unwrap_or_default()),
        );

        match self.gate.run_cycle(self.dwell).await {
            Ok(()) => {
                self.audit.record(&AuditEvent::new(
                    AuditLevel::Info,
                    SOURCE_SERVO,
                    "gate cycle complete".to_string(),
                ));
                decision
            }
            Err(e) => {
                self.audit.record(&AuditEvent::new(
                    AuditLevel::Critical,
                    SOURCE_SERVO,
                    format!("gate cycle aborted: {}", e),
                ));
                let fault = AccessError::ActuatorFault(e.to_string());
                AccessDecision {
                    outcome: AccessOutcome::Error,
                    reason: fault.to_string(),
                    fault: Some(fault),
                    ..decision
                }
            }
        }
    }
}
