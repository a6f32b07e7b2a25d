//! Board-agnostic core logic for the lens adapter
//!
//! This crate contains everything that does not depend on a specific
//! host or on the transfer mechanics:
//!
//! - Configuration types (pins, bus, settle timings)
//! - Calibrated aperture stops and the focus range
//! - Command-letter dispatch
//! - Error taxonomy shared by drivers and binaries
//! - Session state machine

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod config;
pub mod error;
pub mod state;

pub use command::Command;
pub use config::{Aperture, ConfigError, LensConfig, PinConfig, TimingConfig, MAX_FOCUS, MIN_FOCUS};
pub use error::{LensError, ProtocolError, ValidationError};
pub use nightfocus_hal::CapabilityError;
pub use state::{SessionEvent, SessionState};
