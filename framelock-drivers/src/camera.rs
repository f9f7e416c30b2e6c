//! DVP camera
//!
//! A camera is a sensor reached over the register protocol plus a capture
//! session streaming its pixels. The two are held side by side and the
//! camera exposes only sensor-level operations:
//!
//! ```text
//!            ┌──────────── DvpCamera ────────────┐
//!  open() ──►│ probe ─► bus width ─► stream on   │──► session.activate()
//!  read_frame│ snapshot of the frame buffer      │
//!  release() │ session.deactivate() ─► stream off│
//!            └───────────────────────────────────┘
//! ```
//!
//! Sensor configuration must finish before the session is activated, so
//! `open` only activates once every register write succeeded.

use crate::sensor::{SensorError, SensorModel};
use framelock_core::session::{CaptureSession, ResyncOutcome};
use framelock_core::traits::{EdgeHandler, FrameEdge, ReceiverEngine, TransferEngine};
use framelock_hal::RegisterBus;

/// Result of copying one frame out of the capture buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameRead {
    /// Bytes copied
    pub bytes: usize,
    /// Buffer epoch the copy started in
    pub epoch: u32,
    /// A resync started while copying
    pub torn: bool,
    /// The frame in the buffer had reached its full count before copying
    pub complete: bool,
}

impl FrameRead {
    /// Check if the copy holds exactly one whole frame
    pub fn is_clean(&self) -> bool {
        self.complete && !self.torn
    }
}

/// A sensor driver composed with a capture session
pub struct DvpCamera<'d, S, B, R, T, E, const N: usize> {
    sensor: S,
    registers: B,
    session: CaptureSession<'d, R, T, E, N>,
}

impl<'d, S, B, R, T, E, const N: usize> DvpCamera<'d, S, B, R, T, E, N>
where
    S: SensorModel,
    B: RegisterBus,
    R: ReceiverEngine,
    T: TransferEngine,
    E: FrameEdge,
{
    /// Put a sensor and an inactive session together
    pub fn new(sensor: S, registers: B, session: CaptureSession<'d, R, T, E, N>) -> Self {
        Self {
            sensor,
            registers,
            session,
        }
    }

    /// Probe the sensor, start it streaming and start capturing
    ///
    /// Opening an open camera does nothing.
    pub fn open(&mut self) -> Result<(), SensorError<B::Error>> {
        if self.session.is_active() {
            return Ok(());
        }
        let width = self.session.pins().data_width();

        self.sensor.probe(&mut self.registers)?;
        self.sensor.set_bus_width(&mut self.registers, width)?;
        self.sensor.set_streaming(&mut self.registers, true)?;
        self.session.activate();
        Ok(())
    }

    /// Copy the current frame into `out`
    ///
    /// Never blocks and never waits for a frame boundary. Check
    /// [`FrameRead::is_clean`] to learn whether the copy is one whole frame.
    pub fn read_frame(&self, out: &mut [u8]) -> Result<FrameRead, SensorError<B::Error>> {
        if !self.session.is_active() {
            return Err(SensorError::NotOpen);
        }

        // Snapshot first: a resync after it makes the copy inconsistent
        let snapshot = self.session.frame_buffer().snapshot();
        let complete = self.session.transfer_complete();
        let bytes = snapshot.copy_to(out);

        Ok(FrameRead {
            bytes,
            epoch: snapshot.epoch(),
            torn: !snapshot.is_consistent(),
            complete,
        })
    }

    /// Stop capturing and put the sensor in standby
    ///
    /// Capture stops even if the sensor cannot be reached.
    pub fn release(&mut self) -> Result<(), SensorError<B::Error>> {
        self.session.deactivate();
        self.sensor.set_streaming(&mut self.registers, false)
    }

    /// Check if the camera is open
    pub fn is_open(&self) -> bool {
        self.session.is_active()
    }

    /// The capture session
    pub fn session(&self) -> &CaptureSession<'d, R, T, E, N> {
        &self.session
    }

    /// The sensor model
    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Register access for sensor settings beyond the defaults
    ///
    /// Settings that change the frame size need a new session.
    pub fn registers(&mut self) -> &mut B {
        &mut self.registers
    }

    /// Split the camera back into its parts
    pub fn into_parts(self) -> (S, B, CaptureSession<'d, R, T, E, N>) {
        (self.sensor, self.registers, self.session)
    }
}

impl<'d, S, B, R, T, E, const N: usize> EdgeHandler for DvpCamera<'d, S, B, R, T, E, N>
where
    S: SensorModel,
    B: RegisterBus,
    R: ReceiverEngine,
    T: TransferEngine,
    E: FrameEdge,
{
    fn on_frame_edge(&mut self) -> ResyncOutcome {
        self.session.on_frame_edge()
    }
}
