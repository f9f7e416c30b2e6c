//! Frame resynchronization task
//!
//! Runs at interrupt priority. Every VSYNC falling edge realigns capture to
//! the start of the frame buffer before the sensor's first pixel clock of
//! the new frame, so nothing in here may log or wait.

use framelock_hal_rp2040::VsyncWaiter;

use crate::camera::with_camera;
use framelock_core::traits::EdgeHandler;

#[embassy_executor::task]
pub async fn resync_task(mut waiter: VsyncWaiter<'static>) {
    loop {
        waiter.next_frame().await;
        with_camera(|camera| camera.on_frame_edge());
    }
}
