//! Embassy async tasks
//!
//! The resync task runs on the high-priority interrupt executor; everything
//! else runs on the thread executor and only ever takes short locks.

pub mod preview;
pub mod resync;
pub mod stats;

pub use preview::preview_task;
pub use resync::resync_task;
pub use stats::stats_task;
