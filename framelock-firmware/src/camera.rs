//! The board's camera and the statics shared between tasks
//!
//! The sensor is chosen at build time (`ov5640` feature) because it fixes
//! the frame buffer size. `camera.toml` must name the same sensor.

use core::cell::RefCell;

use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::{I2C0, PIO0};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use portable_atomic::AtomicBool;

use framelock_core::buffer::FrameBuffer;
use framelock_core::config::FrameGeometry;
use framelock_drivers::camera::DvpCamera;
use framelock_hal::I2cRegisters;
use framelock_hal_rp2040::{BlockingI2c, DmaTransfer, PioReceiver, VsyncGate};

#[cfg(not(feature = "ov5640"))]
mod sensor {
    pub use framelock_core::config::camera::HM01B0_GEOMETRY as GEOMETRY;
    pub use framelock_drivers::sensor::Hm01b0 as Sensor;
    pub const SENSOR: Sensor = Sensor;
}

#[cfg(feature = "ov5640")]
mod sensor {
    pub use framelock_core::config::camera::OV5640_QVGA_GEOMETRY as GEOMETRY;
    pub use framelock_drivers::sensor::Ov5640 as Sensor;
    pub const SENSOR: Sensor = Sensor;
}

pub use sensor::{Sensor, SENSOR};

/// Frame the sensor streams with its defaults
pub const GEOMETRY: FrameGeometry = sensor::GEOMETRY;

/// Bytes per frame, the capture buffer size
pub const FRAME_BYTES: usize = GEOMETRY.frame_bytes();

/// PIO0 state machine 0
pub type Receiver = PioReceiver<'static, PIO0, 0>;

/// Sensor registers on I2C0
pub type Registers = I2cRegisters<BlockingI2c<I2c<'static, I2C0, Blocking>>>;

pub type Camera =
    DvpCamera<'static, Sensor, Registers, Receiver, DmaTransfer<'static>, VsyncGate, FRAME_BYTES>;

/// Capture target, written by DMA and read by the preview task
pub static FRAME_BUFFER: FrameBuffer<FRAME_BYTES> = FrameBuffer::new();

/// VSYNC gate shared by the session and the resync task
pub static VSYNC_OPEN: AtomicBool = AtomicBool::new(false);

/// The open camera
///
/// Locked from both executors, so every lock is a short critical section.
pub static CAMERA: Mutex<CriticalSectionRawMutex, RefCell<Option<Camera>>> =
    Mutex::new(RefCell::new(None));

/// Run `f` on the camera, if one is installed
pub fn with_camera<R>(f: impl FnOnce(&mut Camera) -> R) -> Option<R> {
    CAMERA.lock(|cell| cell.borrow_mut().as_mut().map(f))
}
