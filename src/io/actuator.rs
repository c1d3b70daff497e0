//! Serial servo actuator for the gate drive
//!
//! Protocol (servo driver board, 8N1):
//! - Command frame: 8 bytes, starts with 0x7E
//! - Frame: [0x7E][0x00][machine][command][data0][data1][data2][checksum]
//! - Checksum: sum all bytes, bitwise NOT
//! - No feedback channel is assumed: the drive is open-loop
//!
//! The port is opened lazily on the first command and dropped again by
//! `release()`, so the device is only held for the duration of one gate
//! cycle.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, info, warn};

// Protocol constants
const START_BYTE_COMMAND: u8 = 0x7E;
const CMD_SET_POSITION: u8 = 0x20;
const CMD_RELEASE: u8 = 0x21;
const COMMAND_FRAME_LEN: usize = 8;

#[derive(Error, Debug)]
pub enum ActuatorError {
    #[error("serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    #[error("serial write error: {0}")]
    Io(#[from] std::io::Error),

    #[error("injected fault: {0}")]
    Fault(String),
}

/// Narrow interface over the physical gate drive.
///
/// `set_position` commands a servo angle; `release` relaxes the drive
/// signal so the servo does not jitter while idle. `release` must always
/// be safe to call, in any state, including after a failed command.
#[async_trait]
pub trait Actuator: Send {
    async fn set_position(&mut self, angle: i16) -> Result<(), ActuatorError>;
    async fn release(&mut self) -> Result<(), ActuatorError>;
}

/// Actuator implementation driving a servo over a serial link
pub struct SerialActuator {
    device: String,
    baud: u32,
    machine_number: u8,
    port: Option<SerialStream>,
}

impl SerialActuator {
    pub fn new(device: &str, baud: u32) -> Self {
        Self { device: device.to_string(), baud, machine_number: 1, port: None }
    }

    fn build_frame(&self, command: u8, data0: u8) -> [u8; COMMAND_FRAME_LEN] {
        let mut frame = [0u8; COMMAND_FRAME_LEN];
        frame[0] = START_BYTE_COMMAND;
        frame[1] = 0x00; // Undefined
        frame[2] = self.machine_number;
        frame[3] = command;
        frame[4] = data0;
        frame[5] = 0x00; // Data1
        frame[6] = 0x00; // Data2

        // Checksum: sum all bytes, bitwise NOT
        let sum: u8 = frame[..7].iter().fold(0u8, |acc, &x| acc.wrapping_add(x));
        frame[7] = !sum;

        frame
    }

    async fn send_frame(&mut self, frame: [u8; COMMAND_FRAME_LEN]) -> Result<(), ActuatorError> {
        if self.port.is_none() {
            let port = tokio_serial::new(&self.device, self.baud).open_native_async()?;
            info!(device = %self.device, baud = %self.baud, "actuator_port_opened");
            self.port = Some(port);
        }
        if let Some(port) = self.port.as_mut() {
            port.write_all(&frame).await?;
            port.flush().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Actuator for SerialActuator {
    async fn set_position(&mut self, angle: i16) -> Result<(), ActuatorError> {
        // Servo range is -90..=90 degrees, sent as a signed byte
        let data0 = angle.clamp(-90, 90) as i8 as u8;
        let frame = self.build_frame(CMD_SET_POSITION, data0);
        self.send_frame(frame).await?;
        debug!(angle = %angle, "actuator_set_position");
        Ok(())
    }

    async fn release(&mut self) -> Result<(), ActuatorError> {
        // Port may never have been opened (e.g. the cycle failed before
        // the first move); releasing an unopened drive is a no-op.
        if self.port.is_none() {
            return Ok(());
        }
        let frame = self.build_frame(CMD_RELEASE, 0x00);
        let result = self.send_frame(frame).await;
        self.port = None;
        if let Err(ref e) = result {
            warn!(error = %e, "actuator_release_write_failed");
        } else {
            debug!("actuator_released");
        }
        result
    }
}

/// Recorded command for mock inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCommand {
    SetPosition(i16),
    Release,
}

/// In-memory actuator for tests and dry runs.
///
/// Records every command into a shared log and can inject a fault on the
/// nth `set_position` call.
pub struct MockActuator {
    commands: Arc<Mutex<Vec<ActuatorCommand>>>,
    /// Fail the set_position call with this zero-based index
    fail_on_set: Option<usize>,
    sets_seen: usize,
}

impl MockActuator {
    pub fn new() -> Self {
        Self { commands: Arc::new(Mutex::new(Vec::new())), fail_on_set: None, sets_seen: 0 }
    }

    /// Inject a fault on the nth set_position call (0 = first)
    pub fn fail_on_set(mut self, n: usize) -> Self {
        self.fail_on_set = Some(n);
        self
    }

    /// Shared handle to the command log, for inspection after the mock has
    /// been moved into a controller
    pub fn command_log(&self) -> Arc<Mutex<Vec<ActuatorCommand>>> {
        self.commands.clone()
    }
}

impl Default for MockActuator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Actuator for MockActuator {
    async fn set_position(&mut self, angle: i16) -> Result<(), ActuatorError> {
        let index = self.sets_seen;
        self.sets_seen += 1;
        if self.fail_on_set == Some(index) {
            return Err(ActuatorError::Fault(format!("set_position({}) refused", angle)));
        }
        self.commands.lock().push(ActuatorCommand::SetPosition(angle));
        Ok(())
    }

    async fn release(&mut self) -> Result<(), ActuatorError> {
        self.commands.lock().push(ActuatorCommand::Release);
        Ok(())
    }
}
