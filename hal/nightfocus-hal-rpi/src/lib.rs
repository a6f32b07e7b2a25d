//! Raspberry Pi HAL for the lens adapter
//!
//! This crate provides Raspberry Pi implementations of the shared
//! `nightfocus-hal` traits on top of `rppal`:
//!
//! - GPIO output pins and BCM pin allocation
//! - spidev-backed SPI bus
//! - Thread-sleep delays
//! - Board detection for the capability probe
//!
//! All handles release their device on drop: output pins are returned to
//! their previous mode and the spidev file is closed.

#![deny(unsafe_code)]

pub mod delay;
pub mod error;
pub mod gpio;
pub mod platform;
pub mod spi;

pub use delay::StdDelay;
pub use error::RpiError;
pub use gpio::{parse_pin_string, GpioAllocator, PinError, RpiOutputPin};
pub use platform::RpiPlatform;
pub use spi::RpiSpi;
