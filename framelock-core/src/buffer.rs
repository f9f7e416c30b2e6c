//! Shared frame buffer
//!
//! The transfer engine writes this buffer from hardware, asynchronously to
//! program order, while the main line reads it. There is exactly one
//! buffer and no lock, so a read can observe a torn frame: a prefix of the
//! frame in flight followed by the tail of the previous one.
//!
//! The type makes that explicit. The only read view is [`FrameSnapshot`],
//! which is "possibly inconsistent" by construction and can tell afterwards
//! whether a resync happened while it was being read:
//!
//! ```text
//! snapshot()        copy_to(out)          is_consistent()
//!   │ epoch=e          │ bytes                │ epoch==e ?
//!   ▼                  ▼                      ▼
//! ──┴──────────────────┴──────────────────────┴──► time
//!           ▲ resync bumps epoch (interrupt context)
//! ```

#![allow(unsafe_code)]

use core::cell::UnsafeCell;
use core::sync::atomic::{compiler_fence, Ordering};

use portable_atomic::AtomicU32;

#[repr(C, align(4))]
struct Aligned<const N: usize>([u8; N]);

/// Single capture destination, sized to exactly one frame
///
/// Word aligned so the transfer engine can move 32-bit units into it.
pub struct FrameBuffer<const N: usize> {
    data: UnsafeCell<Aligned<N>>,
    /// Bumped at the start of every resync
    epoch: AtomicU32,
}

// SAFETY: the CPU only ever reads `data` (through raw pointers, never
// through references handed out by safe code); the only writer is the
// transfer engine. Torn reads are possible and exposed through
// `FrameSnapshot`, not undefined behaviour.
unsafe impl<const N: usize> Sync for FrameBuffer<N> {}

impl<const N: usize> Default for FrameBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FrameBuffer<N> {
    /// Bytes in the buffer
    pub const LEN: usize = N;

    /// Create a zeroed buffer
    pub const fn new() -> Self {
        Self {
            data: UnsafeCell::new(Aligned([0; N])),
            epoch: AtomicU32::new(0),
        }
    }

    /// Bytes in the buffer
    pub const fn len(&self) -> usize {
        N
    }

    /// Check if the buffer holds no bytes (only for `N == 0`)
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Raw pointer to the first byte, for the transfer engine
    pub fn as_ptr(&self) -> *mut u8 {
        self.data.get().cast::<u8>()
    }

    /// Bus address of the first byte
    pub fn base_address(&self) -> u32 {
        self.as_ptr() as usize as u32
    }

    /// Number of resyncs that have started since the buffer was created
    pub fn epoch(&self) -> u32 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Mark the start of a resync
    ///
    /// Called with the transfer engine disabled, before the write cursor
    /// moves back to the base.
    pub(crate) fn begin_resync(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }

    /// Take a possibly-inconsistent view of the current contents
    pub fn snapshot(&self) -> FrameSnapshot<'_, N> {
        FrameSnapshot {
            buffer: self,
            epoch: self.epoch(),
        }
    }
}

/// A view of the frame buffer that may be torn
///
/// Nothing stops the transfer engine from writing while this view is read.
/// Check [`FrameSnapshot::is_consistent`] after reading to learn whether a
/// resync happened in between.
pub struct FrameSnapshot<'a, const N: usize> {
    buffer: &'a FrameBuffer<N>,
    epoch: u32,
}

impl<'a, const N: usize> FrameSnapshot<'a, N> {
    /// Epoch when the snapshot was taken
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Bytes in the frame
    pub fn len(&self) -> usize {
        N
    }

    /// Check if the frame holds no bytes; see [`FrameBuffer::is_empty`]
    pub fn is_empty(&self) -> bool {
        N == 0
    }

    /// Copy the frame into `out`, returning the number of bytes copied
    ///
    /// Copies `min(N, out.len())` bytes.
    pub fn copy_to(&self, out: &mut [u8]) -> usize {
        let len = out.len().min(N);
        compiler_fence(Ordering::Acquire);
        // SAFETY: `len <= N`, the source is valid for reads for the life of
        // the buffer and never aliases `out`. Concurrent hardware writes
        // only change which bytes are observed.
        unsafe {
            core::ptr::copy_nonoverlapping(self.buffer.as_ptr(), out.as_mut_ptr(), len);
        }
        compiler_fence(Ordering::Acquire);
        len
    }

    /// Read one byte
    pub fn get(&self, index: usize) -> Option<u8> {
        if index >= N {
            return None;
        }
        // SAFETY: in bounds, byte reads cannot tear.
        Some(unsafe { core::ptr::read_volatile(self.buffer.as_ptr().add(index)) })
    }

    /// Whether no resync started since the snapshot was taken
    pub fn is_consistent(&self) -> bool {
        self.buffer.epoch() == self.epoch
    }

    /// Borrow the bytes directly
    ///
    /// # Safety
    /// The caller must guarantee the transfer engine is not writing for the
    /// lifetime of the returned slice, e.g. the session is deactivated or
    /// the current frame's transfer count has been reached and no edge can
    /// arrive.
    pub unsafe fn assume_settled(&self) -> &'a [u8] {
        compiler_fence(Ordering::Acquire);
        core::slice::from_raw_parts(self.buffer.as_ptr(), N)
    }
}
