//! Platform capability and resource acquisition
//!
//! A [`Platform`] is the single place hardware handles come from. The
//! session asks it to [`probe`](Platform::probe) before touching anything,
//! then acquires the bus, both pins and a delay source as owned values.

use core::fmt;

use crate::{DelayMs, OutputPin, SpiBus, SpiConfig};

/// Required hardware capability is absent on this host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CapabilityError {
    /// What is missing
    pub reason: &'static str,
}

impl CapabilityError {
    /// Create a new capability error
    pub const fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

impl fmt::Display for CapabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hardware capability unavailable: {}", self.reason)
    }
}

impl core::error::Error for CapabilityError {}

/// Source of bus, pin and delay handles for one host
///
/// Bus and pins share one error type so that a transport fault can be
/// reported without caring which primitive raised it.
pub trait Platform {
    /// Fault raised by the bus or a pin
    type Error;
    /// SPI bus handle
    type Bus: SpiBus<Error = Self::Error>;
    /// Output pin handle
    type Pin: OutputPin<Error = Self::Error>;
    /// Delay source
    type Delay: DelayMs;

    /// Check that this host can drive the adapter at all
    ///
    /// Must not touch any pin or open any device.
    fn probe(&self) -> Result<(), CapabilityError>;

    /// Open the SPI bus with the given configuration
    fn open_bus(&mut self, config: &SpiConfig) -> Result<Self::Bus, Self::Error>;

    /// Acquire a pin as an output, initially driven high
    fn output_pin(&mut self, pin: u8) -> Result<Self::Pin, Self::Error>;

    /// Create a delay source
    fn delay(&mut self) -> Self::Delay;
}
