//! Framelock - Continuous DVP Camera Capture Firmware
//!
//! Main firmware binary for RP2040 boards with a parallel camera sensor.
//! A PIO state machine samples the sensor's data bus, a DMA channel moves
//! the samples into a frame buffer, and every VSYNC edge realigns both to
//! the start of the buffer so a dropped or extra pixel never survives past
//! the frame it happened in.
//!
//! Executors:
//! - SWI_IRQ_1 interrupt executor: VSYNC resync, nothing else
//! - Thread executor: statistics and preview

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_time::Timer;
use static_cell::ConstStaticCell;
use {defmt_rtt as _, panic_probe as _};

use framelock_core::claims::EngineClaims;
use framelock_core::session::{CaptureEngines, CaptureSession};
use framelock_drivers::camera::DvpCamera;
use framelock_drivers::sensor::SensorModel;
use framelock_hal::i2c::I2cConfig;
use framelock_hal::I2cRegisters;
use framelock_hal_rp2040::{
    BlockingI2c, DmaTransfer, MasterClock, PinBank, PioReceiver, VsyncGate, VsyncWaiter,
    SYS_CLK_HZ,
};

use crate::camera::{Sensor, CAMERA, FRAME_BUFFER, FRAME_BYTES, SENSOR, VSYNC_OPEN};

mod camera;
mod config;
mod display;
mod tasks;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

/// Time for the sensor to come out of reset once XCLK runs
const SENSOR_STARTUP_MS: u64 = 50;

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    // SAFETY: SWI_IRQ_1 is reserved for this executor
    unsafe { EXECUTOR_HIGH.on_interrupt() }
}

// Preview copy target (must live forever)
static SCRATCH: ConstStaticCell<[u8; FRAME_BYTES]> = ConstStaticCell::new([0; FRAME_BYTES]);

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Framelock firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();
    if config.sensor != Sensor::KIND {
        error!(
            "camera.toml names {:?} but this firmware is built for {:?}",
            config.sensor,
            Sensor::KIND
        );
        panic!("sensor mismatch");
    }
    info!(
        "Camera: {:?} at {=u8:#x}, {}-bit bus, {} bytes/frame",
        config.sensor,
        config.i2c_address,
        config.pins.data_width().pin_count(),
        config.frame_bytes()
    );

    let (mut bank, board) = PinBank::split(p);
    let dvp = match bank.take_dvp(&config.pins) {
        Ok(pins) => pins,
        Err(e) => {
            error!("Camera pins unavailable: {:?}", e);
            panic!("pin assignment");
        }
    };

    // Sensors clocked from XCLK do not answer on I2C until it runs
    let _xclk = match dvp.master_clock {
        Some(pin) => match MasterClock::start(pin, SYS_CLK_HZ, config.xclk_hz) {
            Ok(clock) => {
                info!("XCLK running at {} Hz", clock.frequency(SYS_CLK_HZ));
                Some(clock)
            }
            Err(e) => {
                error!("Cannot generate XCLK at {} Hz: {:?}", config.xclk_hz, e);
                panic!("master clock");
            }
        },
        None => None,
    };
    Timer::after_millis(SENSOR_STARTUP_MS).await;

    // Control bus
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2cConfig::FAST.frequency;
    let i2c = I2c::new_blocking(board.i2c0, board.i2c_scl, board.i2c_sda, i2c_config);
    let registers = I2cRegisters::new(BlockingI2c::new(i2c), config.i2c_address);

    // Receiver: data bus on PIO0 SM0, HSYNC and PCLK read by absolute GPIO
    let Pio { common, sm0, .. } = Pio::new(board.pio0, Irqs);
    let data = dvp
        .data
        .into_iter()
        .map(|pin| Input::new(pin, Pull::None))
        .collect();
    let receiver = PioReceiver::new(common, sm0, config.pins.data_base(), data);
    let _line_valid = Input::new(dvp.line_valid, Pull::None);
    let _pixel_clock = Input::new(dvp.pixel_clock, Pull::None);

    let transfer = DmaTransfer::new(board.dma_ch0);
    let gate = VsyncGate::new(&VSYNC_OPEN);
    let waiter = VsyncWaiter::new(dvp.frame_valid, &VSYNC_OPEN);

    let mut claims = EngineClaims::new();
    let session = match CaptureSession::new(
        config.pins,
        config.frame_bytes(),
        config.byte_swap,
        CaptureEngines {
            receiver,
            transfer,
            edge: gate,
        },
        &FRAME_BUFFER,
        &mut claims,
    ) {
        Ok(session) => session,
        Err(e) => {
            error!("Capture session setup failed: {:?}", e);
            panic!("capture session");
        }
    };
    info!(
        "Capture session ready: {} words/frame, byte swap {}",
        session.plan().count(),
        session.plan().byte_swap()
    );

    let mut camera = DvpCamera::new(SENSOR, registers, session);
    if let Err(e) = camera.open() {
        error!("Sensor did not start: {:?}", e);
        panic!("sensor open");
    }
    CAMERA.lock(|cell| *cell.borrow_mut() = Some(camera));
    info!("Camera open, waiting for VSYNC");

    // Resync must preempt everything else on the core
    interrupt::SWI_IRQ_1.set_priority(Priority::P1);
    let high = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    high.spawn(unwrap!(tasks::resync_task(waiter)));

    spawner.spawn(unwrap!(tasks::stats_task()));
    spawner.spawn(unwrap!(tasks::preview_task(SCRATCH.take())));

    info!("All tasks spawned, firmware running");

    // Holds the XCLK slice and the HSYNC/PCLK inputs for the lifetime of
    // the firmware
    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
