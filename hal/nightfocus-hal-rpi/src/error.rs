//! Raspberry Pi bus and pin faults

use thiserror::Error;

use crate::gpio::PinError;

/// Fault raised by a Raspberry Pi bus or pin
#[derive(Debug, Error)]
pub enum RpiError {
    /// GPIO character device error
    #[error("gpio: {0}")]
    Gpio(#[from] rppal::gpio::Error),

    /// spidev error
    #[error("spi: {0}")]
    Spi(#[from] rppal::spi::Error),

    /// Pin could not be allocated
    #[error("pin {pin}: {source}")]
    Pin {
        /// BCM pin number
        pin: u8,
        /// Why allocation failed
        source: PinError,
    },

    /// Bus index has no spidev controller
    #[error("no SPI bus {0}")]
    UnknownBus(u8),

    /// Device index has no chip-select on the bus
    #[error("no chip-select {0} on SPI bus")]
    UnknownDevice(u8),

    /// Kernel transferred fewer bytes than requested
    #[error("short SPI transfer ({actual} of {expected} bytes)")]
    ShortTransfer {
        /// Bytes requested
        expected: usize,
        /// Bytes transferred
        actual: usize,
    },
}
