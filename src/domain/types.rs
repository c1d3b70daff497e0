//! Shared types for gate access decisions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::AccessError;

/// Generate a new UUIDv7 (time-sortable)
pub fn new_uuid_v7() -> String {
    Uuid::now_v7().to_string()
}

/// Newtype wrapper for a normalized plate code.
///
/// Built only by `services::plate::normalize`: uppercase, with space and
/// underscore separators stripped. Never persisted; recomputed per decision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct CanonicalPlate(pub String);

impl CanonicalPlate {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for CanonicalPlate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of the authorization list, as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateRecord {
    /// Canonical plate code (uppercase, no separators)
    pub code: String,
    /// Registered owner of the plate
    pub owner: String,
    /// Inactive records are never matched
    pub active: bool,
}

/// Outcome of one access decision cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccessOutcome {
    Granted,
    Denied,
    Error,
}

impl AccessOutcome {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessOutcome::Granted => "granted",
            AccessOutcome::Denied => "denied",
            AccessOutcome::Error => "error",
        }
    }
}

/// Immutable result of one decision cycle.
///
/// Created once per invocation by the orchestrator and consumed by the
/// audit trail and the process exit-code mapping.
#[derive(Debug)]
pub struct AccessDecision {
    /// UUIDv7 decision id
    pub id: String,
    pub outcome: AccessOutcome,
    /// Normalized plate the decision was made about (empty if no detection)
    pub subject: CanonicalPlate,
    /// The authorization record that matched, if any
    pub matched: Option<PlateRecord>,
    /// Hamming distance to the matched record
    pub distance: Option<u32>,
    /// Human-readable explanation
    pub reason: String,
    /// Terminal failure behind a non-granted outcome, if the cycle did not
    /// complete normally (drives the process exit status)
    pub fault: Option<AccessError>,
}

impl AccessDecision {
    pub fn granted(subject: CanonicalPlate, record: PlateRecord, distance: u32) -> Self {
        let reason = format!(
            "access granted: {} matches {} (distance {})",
            subject, record.code, distance
        );
        Self {
            id: new_uuid_v7(),
            outcome: AccessOutcome::Granted,
            subject,
            matched: Some(record),
            distance: Some(distance),
            reason,
            fault: None,
        }
    }

    pub fn denied(subject: CanonicalPlate, reason: String, fault: Option<AccessError>) -> Self {
        Self {
            id: new_uuid_v7(),
            outcome: AccessOutcome::Denied,
            subject,
            matched: None,
            distance: None,
            reason,
            fault,
        }
    }

    pub fn error(subject: CanonicalPlate, fault: AccessError) -> Self {
        Self {
            id: new_uuid_v7(),
            outcome: AccessOutcome::Error,
            subject,
            matched: None,
            distance: None,
            reason: fault.to_string(),
            fault: Some(fault),
        }
    }

    /// Process exit status for upstream tooling: non-zero whenever the
    /// cycle did not complete normally (no detection, invalid format,
    /// data-source failure, actuator fault). A clean no-match denial and a
    /// granted cycle both exit zero.
    pub fn exit_code(&self) -> u8 {
        if self.fault.is_some() {
            1
        } else {
            0
        }
    }
}

/// Commanded actuator state. Open-loop: this is the last commanded
/// position, not a sensed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Closed,
    Opening,
    Open,
    Closing,
}

impl GateState {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            GateState::Closed => "closed",
            GateState::Opening => "opening",
            GateState::Open => "open",
            GateState::Closing => "closing",
        }
    }
}

/// Severity/category of an audit event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditLevel {
    Info,
    Granted,
    Denied,
    Error,
    Critical,
}

impl AuditLevel {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditLevel::Info => "INFO",
            AuditLevel::Granted => "GRANTED",
            AuditLevel::Denied => "DENIED",
            AuditLevel::Error => "ERROR",
            AuditLevel::Critical => "CRITICAL",
        }
    }
}

/// A structured record appended to the audit trail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    pub level: AuditLevel,
    /// Component that produced the event (e.g. "GateAccess", "GateServo")
    pub source: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,
}

impl AuditEvent {
    pub fn new(level: AuditLevel, source: &str, message: String) -> Self {
        Self { timestamp: Utc::now(), level, source: source.to_string(), message, actor_id: None }
    }

    pub fn with_actor(mut self, actor_id: &str) -> Self {
        self.actor_id = Some(actor_id.to_string());
        self
    }
}
