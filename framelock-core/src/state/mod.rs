//! Resync state machine
//!
//! The capture session's lifecycle is a function of the current state and
//! an event. Hardware side effects live in the session; this module only
//! decides where the session is.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::State;
