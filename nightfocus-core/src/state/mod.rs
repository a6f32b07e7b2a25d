//! Session state machine
//!
//! Tracks whether an exchange is in flight and whether the last operation
//! left the adapter in an error state.

pub mod events;
pub mod machine;

pub use events::SessionEvent;
pub use machine::SessionState;
