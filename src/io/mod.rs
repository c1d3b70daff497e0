//! IO modules - external system interfaces
//!
//! This module contains all external IO operations:
//! - `recognizer` - runs the external plate recognition pipeline
//! - `store` - authorization list reads (allowed plates)
//! - `audit` - audit trail output to file (JSONL format)
//! - `actuator` - serial servo driver for the physical gate

pub mod actuator;
pub mod audit;
pub mod recognizer;
pub mod store;

// Re-export commonly used types
pub use actuator::{Actuator, ActuatorError, MockActuator, SerialActuator};
pub use audit::AuditLog;
pub use recognizer::{CommandRecognizer, PlateSource};
pub use store::{AuthorizationStore, JsonFileStore};
