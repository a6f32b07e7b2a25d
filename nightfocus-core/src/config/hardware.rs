//! Hardware configuration types
//!
//! These types define which pins the adapter is wired to, how the SPI bus
//! is opened, and how long the mechanism is given to settle.

use core::fmt;

use nightfocus_hal::SpiConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shortest open settle the stage is known to tolerate
pub const MIN_OPEN_SETTLE_MS: u32 = 5_000;

/// Shortest wait between a move and its settle frame
pub const MIN_COMMAND_SETTLE_MS: u32 = 1_500;

/// Bounds of the reset pulse width
pub const RESET_PULSE_RANGE_MS: (u32, u32) = (100, 500);

/// Shortest wait after releasing the reset line
pub const MIN_RESET_SETTLE_MS: u32 = 600;

/// BCM pin assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PinConfig {
    /// Slave-select line, asserted low around each transfer
    pub slave_select: u8,
    /// Hardware reset line, pulsed low to reset the adapter
    pub reset: u8,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            slave_select: 5,
            reset: 6,
        }
    }
}

/// Settle delays, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// Wait after OPEN while the stage initialises
    pub open_settle_ms: u32,
    /// Wait between a focus/aperture frame and the settle frame
    pub command_settle_ms: u32,
    /// Width of the reset pulse
    pub reset_pulse_ms: u32,
    /// Wait after releasing the reset line
    pub reset_settle_ms: u32,
    /// Pause between the steps of a power-cycled focus
    pub cycle_pause_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            open_settle_ms: 5_000,
            command_settle_ms: 1_500,
            reset_pulse_ms: 500,
            reset_settle_ms: 600,
            cycle_pause_ms: 2_000,
        }
    }
}

/// Complete adapter configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LensConfig {
    /// Pin assignment
    pub pins: PinConfig,
    /// SPI bus settings
    pub spi: SpiConfig,
    /// Settle delays
    pub timing: TimingConfig,
    /// Reject non-sentinel responses whose checksum does not match
    ///
    /// Off by default: the adapter firmware is not known to checksum its
    /// replies.
    pub strict_checksum: bool,
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Slave-select and reset are assigned the same pin
    PinConflict(u8),
    /// SPI clock of 0 Hz
    ZeroClock,
    /// A settle delay is shorter than the mechanism allows
    SettleTooShort {
        /// Which delay
        name: &'static str,
        /// Configured value
        ms: u32,
        /// Smallest accepted value
        min_ms: u32,
    },
    /// Reset pulse outside the accepted window
    ResetPulseOutOfRange(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::PinConflict(pin) => {
                write!(f, "slave-select and reset both assigned to pin {pin}")
            }
            ConfigError::ZeroClock => f.write_str("SPI clock frequency must be non-zero"),
            ConfigError::SettleTooShort { name, ms, min_ms } => {
                write!(f, "{name} of {ms} ms is below the {min_ms} ms minimum")
            }
            ConfigError::ResetPulseOutOfRange(ms) => write!(
                f,
                "reset pulse of {ms} ms outside {}..={} ms",
                RESET_PULSE_RANGE_MS.0, RESET_PULSE_RANGE_MS.1
            ),
        }
    }
}

impl core::error::Error for ConfigError {}

impl LensConfig {
    /// Check the configuration for values the adapter cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pins.slave_select == self.pins.reset {
            return Err(ConfigError::PinConflict(self.pins.reset));
        }
        if self.spi.frequency == 0 {
            return Err(ConfigError::ZeroClock);
        }

        let t = &self.timing;
        for (name, ms, min_ms) in [
            ("open settle", t.open_settle_ms, MIN_OPEN_SETTLE_MS),
            ("command settle", t.command_settle_ms, MIN_COMMAND_SETTLE_MS),
            ("reset settle", t.reset_settle_ms, MIN_RESET_SETTLE_MS),
        ] {
            if ms < min_ms {
                return Err(ConfigError::SettleTooShort { name, ms, min_ms });
            }
        }

        let (lo, hi) = RESET_PULSE_RANGE_MS;
        if !(lo..=hi).contains(&t.reset_pulse_ms) {
            return Err(ConfigError::ResetPulseOutOfRange(t.reset_pulse_ms));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = LensConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.pins.slave_select, 5);
        assert_eq!(config.pins.reset, 6);
        assert_eq!(config.spi.frequency, 1_000_000);
        assert!(!config.strict_checksum);
    }

    #[test]
    fn test_pin_conflict() {
        let mut config = LensConfig::default();
        config.pins.reset = 5;
        assert_eq!(config.validate(), Err(ConfigError::PinConflict(5)));
    }

    #[test]
    fn test_zero_clock() {
        let mut config = LensConfig::default();
        config.spi.frequency = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroClock));
    }

    #[test]
    fn test_settle_minimums() {
        let mut config = LensConfig::default();
        config.timing.open_settle_ms = 4_999;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SettleTooShort { min_ms: 5_000, .. })
        ));

        let mut config = LensConfig::default();
        config.timing.command_settle_ms = 1_000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SettleTooShort { min_ms: 1_500, .. })
        ));
    }

    #[test]
    fn test_reset_pulse_window() {
        let mut config = LensConfig::default();
        config.timing.reset_pulse_ms = 100;
        assert_eq!(config.validate(), Ok(()));
        config.timing.reset_pulse_ms = 50;
        assert_eq!(config.validate(), Err(ConfigError::ResetPulseOutOfRange(50)));
        config.timing.reset_pulse_ms = 2_000;
        assert_eq!(config.validate(), Err(ConfigError::ResetPulseOutOfRange(2_000)));
    }
}
