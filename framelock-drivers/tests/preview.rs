mod common;

use common::{fill, session, Shared};
use framelock_core::buffer::FrameBuffer;
use framelock_core::config::{FrameGeometry, PixelFormat, PinAssignment};
use framelock_core::traits::DisplaySurface;
use framelock_drivers::preview::{forward_frame, PreviewError, PreviewOutcome};

/// Records what it was asked to show
#[derive(Default)]
struct MockDisplay {
    shown: Vec<(FrameGeometry, Vec<u8>)>,
    reject: bool,
}

impl DisplaySurface for MockDisplay {
    type Error = ();

    fn show(&mut self, geometry: &FrameGeometry, pixels: &[u8]) -> Result<(), ()> {
        if self.reject {
            return Err(());
        }
        self.shown.push((*geometry, pixels.to_vec()));
        Ok(())
    }
}

fn geometry_8x8() -> FrameGeometry {
    FrameGeometry::new(8, 8, PixelFormat::Gray8).unwrap()
}

#[test]
fn test_forwards_whole_frame() {
    let buffer: FrameBuffer<64> = FrameBuffer::new();
    fill(&buffer, 0x7F);
    let mut display = MockDisplay::default();
    let mut scratch = [0u8; 80];

    let outcome = forward_frame(&mut display, &geometry_8x8(), &buffer, &mut scratch, || true).unwrap();

    assert_eq!(outcome, PreviewOutcome::Shown { epoch: 0 });
    assert_eq!(display.shown.len(), 1);
    let (geometry, pixels) = &display.shown[0];
    assert_eq!(*geometry, geometry_8x8());
    assert_eq!(pixels.len(), 64);
    assert!(pixels.iter().all(|&b| b == 0x7F));
}

#[test]
fn test_geometry_must_match_buffer() {
    let buffer: FrameBuffer<64> = FrameBuffer::new();
    let mut display = MockDisplay::default();
    let mut scratch = [0u8; 128];
    let rgb = FrameGeometry::new(8, 8, PixelFormat::Rgb565).unwrap();

    assert_eq!(
        forward_frame(&mut display, &rgb, &buffer, &mut scratch, || true),
        Err(PreviewError::GeometryMismatch {
            geometry_bytes: 128,
            buffer_bytes: 64
        })
    );
    assert!(display.shown.is_empty());
}

#[test]
fn test_scratch_too_small() {
    let buffer: FrameBuffer<64> = FrameBuffer::new();
    let mut display = MockDisplay::default();
    let mut scratch = [0u8; 32];

    assert_eq!(
        forward_frame(&mut display, &geometry_8x8(), &buffer, &mut scratch, || true),
        Err(PreviewError::ScratchTooSmall {
            needed: 64,
            available: 32
        })
    );
}

#[test]
fn test_display_error_propagates() {
    let buffer: FrameBuffer<64> = FrameBuffer::new();
    let mut display = MockDisplay {
        reject: true,
        ..Default::default()
    };
    let mut scratch = [0u8; 64];

    assert_eq!(
        forward_frame(&mut display, &geometry_8x8(), &buffer, &mut scratch, || true),
        Err(PreviewError::Display(()))
    );
}

#[test]
fn test_frame_in_flight_is_skipped() {
    let hw = Shared::default();
    let buffer: FrameBuffer<64> = FrameBuffer::new();
    let mut session = session(&hw, PinAssignment::DEFAULT_BOARD, &buffer);
    session.activate();
    fill(&buffer, 0x11);
    session.on_frame_edge();

    // Transfer engine is halfway through the new frame
    for i in 0..32 {
        unsafe { buffer.as_ptr().add(i).write_volatile(0x22) };
    }
    hw.borrow_mut().remaining = 8;

    let mut display = MockDisplay::default();
    let mut scratch = [0u8; 64];
    let outcome = forward_frame(&mut display, &geometry_8x8(), &buffer, &mut scratch, || {
        session.transfer_complete()
    })
    .unwrap();

    assert_eq!(outcome, PreviewOutcome::SkippedTorn);
    assert!(display.shown.is_empty());

    // Frame finishes
    for i in 32..64 {
        unsafe { buffer.as_ptr().add(i).write_volatile(0x22) };
    }
    hw.borrow_mut().remaining = 0;
    let outcome = forward_frame(&mut display, &geometry_8x8(), &buffer, &mut scratch, || {
        session.transfer_complete()
    })
    .unwrap();

    assert_eq!(outcome, PreviewOutcome::Shown { epoch: 1 });
    assert!(display.shown[0].1.iter().all(|&b| b == 0x22));
}

#[test]
fn test_resync_during_copy_is_skipped() {
    let hw = Shared::default();
    let buffer: FrameBuffer<64> = FrameBuffer::new();
    let mut session = session(&hw, PinAssignment::DEFAULT_BOARD, &buffer);
    session.activate();
    session.on_frame_edge();
    fill(&buffer, 0x33);
    hw.borrow_mut().remaining = 0;

    let mut display = MockDisplay::default();
    let mut scratch = [0u8; 64];
    // The next edge lands after the completion check
    let outcome = forward_frame(&mut display, &geometry_8x8(), &buffer, &mut scratch, || {
        let complete = session.transfer_complete();
        session.on_frame_edge();
        complete
    })
    .unwrap();

    assert_eq!(outcome, PreviewOutcome::SkippedTorn);
    assert!(display.shown.is_empty());
}
