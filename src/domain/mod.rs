//! Domain models - core business types for gate access decisions
//!
//! This module contains the canonical data types used throughout the system:
//! - `CanonicalPlate` - a normalized plate code used for all comparisons
//! - `PlateRecord` - an authorization-list entry
//! - `AccessDecision` - the immutable result of one decision cycle
//! - `GateState` - the commanded state of the gate actuator
//! - `AuditEvent` - a structured record appended to the audit trail
//! - `AccessError` - the error taxonomy for terminal decision failures

pub mod error;
pub mod types;
