//! Error taxonomy for the access decision pipeline
//!
//! Every variant is terminal for the current decision cycle: nothing is
//! retried automatically, because repeating an actuator command or reusing
//! a stale recognition result without re-validating is unsafe. Audit write
//! failures are deliberately absent here; they are swallowed inside
//! `io::audit` and never reach the pipeline.

use thiserror::Error;

/// Terminal failures of one decision cycle
#[derive(Error, Debug)]
pub enum AccessError {
    /// The recognition pipeline produced no plate
    #[error("no plate detected by recognizer")]
    RecognitionMissing,

    /// The normalized plate does not satisfy the configured grammar
    #[error("invalid plate format: {0}")]
    FormatInvalid(String),

    /// The authorization store could not be read
    #[error("authorization store unavailable: {0}")]
    DataSourceUnavailable(String),

    /// The authorization store returned zero records (fail closed)
    #[error("authorization store returned no records")]
    DataSourceEmpty,

    /// The gate actuator rejected or failed a movement command
    #[error("actuator fault: {0}")]
    ActuatorFault(String),
}
