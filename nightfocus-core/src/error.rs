//! Error taxonomy
//!
//! Five kinds of failure, in the order they can happen:
//!
//! - [`ConfigError`]: settings the adapter cannot work with
//! - [`ValidationError`]: bad input, caught before any transfer
//! - [`CapabilityError`]: the host cannot drive the adapter at all
//! - [`ProtocolError`]: the adapter answered with an error pattern
//! - `Transport(E)`: the bus or a pin faulted

use core::fmt;

use nightfocus_hal::CapabilityError;
use nightfocus_protocol::{CommandFrame, Response, ResponseError};

use crate::config::ConfigError;

/// Input rejected before anything was sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValidationError {
    /// Focus step outside `MIN_FOCUS..=MAX_FOCUS`
    FocusOutOfRange(u32),
    /// Value does not fit in the two value bytes
    ValueOutOfRange(u32),
    /// Value is not a calibrated aperture stop
    UnknownAperture(u32),
    /// Command letter is not one of `O`, `I`, `F`, `A`, `R`
    UnknownCommand(char),
    /// Value argument is neither a number nor a stop name
    InvalidValue,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FocusOutOfRange(v) => write!(
                f,
                "focus should be between {} and {} ({v} invalid)",
                crate::MIN_FOCUS,
                crate::MAX_FOCUS
            ),
            ValidationError::ValueOutOfRange(v) => write!(f, "value {v} does not fit in 16 bits"),
            ValidationError::UnknownAperture(v) => {
                write!(f, "{v} is not a calibrated aperture position")
            }
            ValidationError::UnknownCommand(c) => {
                write!(f, "unknown control command {c:?} (not O, I, F, A or R)")
            }
            ValidationError::InvalidValue => {
                f.write_str("value must be a number or an aperture name (V0..V11, MAX, MIN)")
            }
        }
    }
}

impl core::error::Error for ValidationError {}

/// Adapter rejected an exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProtocolError {
    /// Frame that was sent
    pub frame: CommandFrame,
    /// Response that came back
    pub response: Response,
    /// Why the response was rejected
    pub cause: ResponseError,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "received invalid response {} to frame {}: {}",
            self.response, self.frame, self.cause
        )
    }
}

impl core::error::Error for ProtocolError {}

/// Any failure of a lens operation
///
/// `E` is the platform's bus/pin fault type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LensError<E> {
    /// Configuration rejected; nothing was acquired
    Config(ConfigError),
    /// Bad input; nothing was sent
    Validation(ValidationError),
    /// Adapter answered with an error pattern
    Protocol(ProtocolError),
    /// Host lacks the GPIO/SPI capability
    Capability(CapabilityError),
    /// Bus or pin fault
    Transport(E),
}

impl<E> LensError<E> {
    /// Whether the error happened before anything touched the hardware
    pub fn is_pre_transfer(&self) -> bool {
        matches!(
            self,
            LensError::Config(_) | LensError::Validation(_) | LensError::Capability(_)
        )
    }
}

impl<E> From<ConfigError> for LensError<E> {
    fn from(e: ConfigError) -> Self {
        LensError::Config(e)
    }
}

impl<E> From<ValidationError> for LensError<E> {
    fn from(e: ValidationError) -> Self {
        LensError::Validation(e)
    }
}

impl<E> From<ProtocolError> for LensError<E> {
    fn from(e: ProtocolError) -> Self {
        LensError::Protocol(e)
    }
}

impl<E> From<CapabilityError> for LensError<E> {
    fn from(e: CapabilityError) -> Self {
        LensError::Capability(e)
    }
}

impl<E: fmt::Display> fmt::Display for LensError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LensError::Config(e) => write!(f, "invalid configuration: {e}"),
            LensError::Validation(e) => write!(f, "invalid input: {e}"),
            LensError::Protocol(e) => write!(f, "protocol error: {e}"),
            LensError::Capability(e) => e.fmt(f),
            LensError::Transport(e) => write!(f, "transport fault: {e}"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> core::error::Error for LensError<E> {}
