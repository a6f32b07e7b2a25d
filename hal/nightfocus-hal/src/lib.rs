//! nightfocus Hardware Abstraction Layer
//!
//! This crate defines the two narrow hardware interfaces the lens protocol
//! is built on, plus the platform seam that hands them out. Board support
//! crates (Raspberry Pi, test rigs) implement these traits; the protocol,
//! core and driver crates only ever see the traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  nightfocus-drivers (sequencer, session)│
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  nightfocus-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ nightfocus-   │       │  recording    │
//! │   hal-rpi     │       │  test rigs    │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output (slave-select, reset line)
//! - [`spi::SpiBus`] - Full-duplex SPI transfer
//! - [`delay::DelayMs`] - Blocking millisecond delays
//! - [`platform::Platform`] - Capability probe and resource acquisition

#![no_std]
#![deny(unsafe_code)]

pub mod delay;
pub mod gpio;
pub mod platform;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use delay::DelayMs;
pub use gpio::OutputPin;
pub use platform::{CapabilityError, Platform};
pub use spi::{Mode, SpiBus, SpiConfig};
