//! Command-letter dispatch
//!
//! Maps the single-letter commands accepted at the process boundary to
//! lens intents. Parsing never touches hardware, so an unknown letter is
//! rejected before any pin is driven.

use core::fmt;

use crate::config::Aperture;
use crate::error::ValidationError;

/// A lens intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// `O`: initialise the stage
    Open,
    /// `I`: return to idle
    Idle,
    /// `F <step>`: move focus (range checked when executed)
    Focus(u16),
    /// `A <stop>`: move aperture
    Aperture(Aperture),
    /// `R`: pulse the hardware reset line
    Reset,
}

impl Command {
    /// Parse a command letter and its optional value argument
    ///
    /// A missing value is read as 0. Aperture values may be given as a stop
    /// name (`V0`..`V11`, `MAX`, `MIN`) or as a calibrated position.
    pub fn parse(letter: char, value: Option<&str>) -> Result<Self, ValidationError> {
        match letter {
            'O' => Ok(Command::Open),
            'I' => Ok(Command::Idle),
            'R' => Ok(Command::Reset),
            'F' => parse_u16(value).map(Command::Focus),
            'A' => {
                if let Some(stop) = value.and_then(Aperture::from_name) {
                    return Ok(Command::Aperture(stop));
                }
                let position = parse_u16(value)?;
                Aperture::from_value(position)
                    .map(Command::Aperture)
                    .ok_or(ValidationError::UnknownAperture(position as u32))
            }
            other => Err(ValidationError::UnknownCommand(other)),
        }
    }

    /// Command letter
    pub const fn letter(&self) -> char {
        match self {
            Command::Open => 'O',
            Command::Idle => 'I',
            Command::Focus(_) => 'F',
            Command::Aperture(_) => 'A',
            Command::Reset => 'R',
        }
    }
}

fn parse_u16(value: Option<&str>) -> Result<u16, ValidationError> {
    let Some(raw) = value else {
        return Ok(0);
    };
    let wide: u32 = raw.trim().parse().map_err(|_| ValidationError::InvalidValue)?;
    u16::try_from(wide).map_err(|_| ValidationError::ValueOutOfRange(wide))
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Focus(step) => write!(f, "F {step}"),
            Command::Aperture(stop) => write!(f, "A {} ({})", stop.name(), stop.value()),
            other => write!(f, "{}", other.letter()),
        }
    }
}
