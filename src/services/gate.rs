//! Gate actuator state machine
//!
//! Drives the physical gate through a strict CLOSED -> OPENING -> OPEN ->
//! CLOSING -> CLOSED cycle over an injected actuator. The machine is
//! open-loop: `GateState` is the last commanded position, not a sensed
//! one, and after any fault it falls back to CLOSED (the fail-safe
//! assumption). A failed movement is never retried - physical motion is
//! not safe to repeat blindly without knowing the true position.

use crate::domain::types::GateState;
use crate::infra::config::Config;
use crate::io::actuator::{Actuator, ActuatorError};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum GateError {
    #[error("actuator fault: {0}")]
    Actuator(#[from] ActuatorError),

    #[error("invalid transition: {op} from {state}")]
    InvalidTransition { op: &'static str, state: &'static str },
}

/// Controller owning the gate state and the actuator drive
pub struct GateController {
    state: GateState,
    actuator: Box<dyn Actuator>,
    open_angle: i16,
    closed_angle: i16,
    settle: Duration,
}

impl GateController {
    pub fn new(config: &Config, actuator: Box<dyn Actuator>) -> Self {
        Self {
            state: GateState::Closed,
            actuator,
            open_angle: config.open_angle(),
            closed_angle: config.closed_angle(),
            settle: Duration::from_millis(config.settle_ms()),
        }
    }

    /// Last commanded state
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Command the gate open. Valid only from a rest-toward-closed state
    /// (CLOSED or CLOSING); blocks for the settle duration after the move.
    pub async fn open(&mut self) -> Result<(), GateError> {
        match self.state {
            GateState::Closed | GateState::Closing => {}
            state => {
                return Err(GateError::InvalidTransition { op: "open", state: state.as_str() })
            }
        }

        self.state = GateState::Opening;
        info!(angle = %self.open_angle, "gate_opening");

        match self.actuator.set_position(self.open_angle).await {
            Ok(()) => {
                tokio::time::sleep(self.settle).await;
                self.state = GateState::Open;
                info!("gate_open");
                Ok(())
            }
            Err(e) => {
                // Fail-safe: assume closed when the command did not take
                self.state = GateState::Closed;
                error!(error = %e, "gate_open_failed");
                Err(e.into())
            }
        }
    }

    /// Hold the gate open for the transit window
    pub async fn hold_open(&mut self, dwell: Duration) -> Result<(), GateError> {
        if self.state != GateState::Open {
            return Err(GateError::InvalidTransition {
                op: "hold_open",
                state: self.state.as_str(),
            });
        }
        info!(dwell_ms = %dwell.as_millis(), "gate_holding");
        tokio::time::sleep(dwell).await;
        Ok(())
    }

    /// Command the gate closed. Valid only from OPEN; blocks for the
    /// settle duration after the move.
    pub async fn close(&mut self) -> Result<(), GateError> {
        if self.state != GateState::Open {
            return Err(GateError::InvalidTransition { op: "close", state: self.state.as_str() });
        }

        self.state = GateState::Closing;
        info!(angle = %self.closed_angle, "gate_closing");

        match self.actuator.set_position(self.closed_angle).await {
            Ok(()) => {
                tokio::time::sleep(self.settle).await;
                self.state = GateState::Closed;
                info!("gate_closed");
                Ok(())
            }
            Err(e) => {
                self.state = GateState::Closed;
                error!(error = %e, "gate_close_failed");
                Err(e.into())
            }
        }
    }

    /// Relax the actuator drive signal to prevent jitter while idle.
    /// Always safe to call, in any state, including after a fault; a
    /// failed release is reported on the diagnostic channel only.
    pub async fn release(&mut self) {
        if let Err(e) = self.actuator.release().await {
            error!(error = %e, "gate_release_failed");
        }
    }

    /// Run one full open -> hold -> close cycle.
    /// `release()` runs on every exit path, success or fault, exactly
    /// once; after a fault the remainder of the cycle is abandoned.
    pub async fn run_cycle(&mut self, dwell: Duration) -> Result<(), GateError> {
        let result = self.cycle(dwell).await;
        self.release().await;
        result
    }

    async fn cycle(&mut self, dwell: Duration) -> Result<(), GateError> {
        self.open().await?;
        self.hold_open(dwell).await?;
        self.close().await?;
        Ok(())
    }
}
