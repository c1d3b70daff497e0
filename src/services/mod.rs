//! Services - business logic and state management
//!
//! This module contains the core decision and control logic:
//! - `plate` - plate normalization and format validation
//! - `matcher` - bounded edit-distance matching against the allowed list
//! - `gate` - gate actuator state machine
//! - `orchestrator` - the full per-invocation decision cycle

pub mod gate;
pub mod matcher;
pub mod orchestrator;
pub mod plate;

// Re-export commonly used types
pub use gate::GateController;
pub use matcher::{find_match, hamming_distance, PlateMatch};
pub use orchestrator::AccessOrchestrator;
pub use plate::{normalize, PlateGrammar};
