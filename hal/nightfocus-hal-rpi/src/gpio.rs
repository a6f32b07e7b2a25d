//! GPIO pins
//!
//! BCM pin numbering throughout. The allocator keeps one platform from
//! handing out the same line twice.

use core::fmt;

use heapless::FnvIndexSet;
use log::trace;
use nightfocus_hal::OutputPin;
use thiserror::Error;

use crate::RpiError;

/// Number of BCM lines on the 40-pin header
pub const GPIO_COUNT: u8 = 28;

/// Why a pin could not be handed out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PinError {
    /// Not a header line
    #[error("not a BCM header pin (0-27)")]
    OutOfRange,
    /// Already handed out by this platform
    #[error("already in use")]
    InUse,
}

/// Tracks which BCM pins have been handed out
pub struct GpioAllocator {
    allocated: FnvIndexSet<u8, 32>,
}

impl Default for GpioAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioAllocator {
    pub fn new() -> Self {
        Self {
            allocated: FnvIndexSet::new(),
        }
    }

    /// Claim a pin
    pub fn allocate(&mut self, pin: u8) -> Result<(), PinError> {
        if pin >= GPIO_COUNT {
            return Err(PinError::OutOfRange);
        }
        match self.allocated.insert(pin) {
            Ok(true) => Ok(()),
            Ok(false) => Err(PinError::InUse),
            // Capacity exceeds GPIO_COUNT, so a full set means every pin is taken
            Err(_) => Err(PinError::InUse),
        }
    }

    /// Give a pin back
    pub fn release(&mut self, pin: u8) {
        self.allocated.remove(&pin);
    }

    pub fn is_allocated(&self, pin: u8) -> bool {
        self.allocated.contains(&pin)
    }
}

/// Parse a pin from config
///
/// Accepts a bare BCM number ("5") or a prefixed name ("gpio5", "GPIO5",
/// "bcm5"). Returns `None` for anything else, including lines off the header.
pub fn parse_pin_string(s: &str) -> Option<u8> {
    let s = s.trim();
    let lower = s.to_ascii_lowercase();

    let num_str = lower
        .strip_prefix("gpio")
        .or_else(|| lower.strip_prefix("bcm"))
        .unwrap_or(&lower);

    if num_str.is_empty() || !num_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let pin: u8 = num_str.parse().ok()?;

    if pin >= GPIO_COUNT {
        return None;
    }

    Some(pin)
}

/// Output line driven through the GPIO character device
///
/// Dropping the pin returns the line to the mode it had before it was
/// claimed.
pub struct RpiOutputPin {
    pin: rppal::gpio::OutputPin,
}

impl RpiOutputPin {
    pub(crate) fn new(pin: rppal::gpio::OutputPin) -> Self {
        Self { pin }
    }

    /// BCM number of this line
    pub fn number(&self) -> u8 {
        self.pin.pin()
    }
}

impl fmt::Debug for RpiOutputPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RpiOutputPin(gpio{})", self.number())
    }
}

impl OutputPin for RpiOutputPin {
    type Error = RpiError;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        trace!("gpio{} high", self.number());
        self.pin.set_high();
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        trace!("gpio{} low", self.number());
        self.pin.set_low();
        Ok(())
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator() {
        let mut alloc = GpioAllocator::new();

        assert!(alloc.allocate(5).is_ok());
        assert!(alloc.is_allocated(5));

        // Can't allocate same pin twice
        assert_eq!(alloc.allocate(5), Err(PinError::InUse));

        assert!(alloc.allocate(6).is_ok());

        alloc.release(5);
        assert!(!alloc.is_allocated(5));
        assert!(alloc.allocate(5).is_ok());
    }

    #[test]
    fn test_allocator_rejects_off_header_pins() {
        let mut alloc = GpioAllocator::new();
        assert_eq!(alloc.allocate(28), Err(PinError::OutOfRange));
        assert!(alloc.allocate(27).is_ok());
    }

    #[test]
    fn test_every_header_pin_allocates_once() {
        let mut alloc = GpioAllocator::new();
        for pin in 0..GPIO_COUNT {
            assert!(alloc.allocate(pin).is_ok());
        }
        for pin in 0..GPIO_COUNT {
            assert_eq!(alloc.allocate(pin), Err(PinError::InUse));
        }
    }

    #[test]
    fn test_parse_pin_string() {
        assert_eq!(parse_pin_string("gpio5"), Some(5));
        assert_eq!(parse_pin_string("GPIO6"), Some(6));
        assert_eq!(parse_pin_string("bcm17"), Some(17));
        assert_eq!(parse_pin_string(" 27 "), Some(27));
        assert_eq!(parse_pin_string("gpio0"), Some(0));

        // Invalid
        assert_eq!(parse_pin_string("gpio28"), None);
        assert_eq!(parse_pin_string("gpio"), None);
        assert_eq!(parse_pin_string("pin11"), None);
        assert_eq!(parse_pin_string("gpio+5"), None);
        assert_eq!(parse_pin_string(""), None);
    }
}
