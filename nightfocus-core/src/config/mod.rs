//! Configuration types
//!
//! Pin numbers, bus settings and settle delays are explicit parameters
//! rather than constants baked into each command.

pub mod aperture;
pub mod hardware;

pub use aperture::{Aperture, MAX_FOCUS, MIN_FOCUS};
pub use hardware::*;
