//! Configuration file loading
//!
//! The file mirrors [`LensConfig`], except that pins may be written either
//! as a BCM number or as a `"gpioN"` string.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::debug;
use serde::Deserialize;

use nightfocus_core::{LensConfig, PinConfig, TimingConfig};
use nightfocus_hal::SpiConfig;
use nightfocus_hal_rpi::parse_pin_string;

/// A pin as written in the file
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PinSpec {
    Number(u8),
    Name(String),
}

impl PinSpec {
    fn resolve(&self, key: &str) -> Result<u8> {
        match self {
            PinSpec::Number(pin) => Ok(*pin),
            PinSpec::Name(name) => {
                parse_pin_string(name).ok_or_else(|| anyhow!("pins.{key}: invalid pin {name:?}"))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PinsFile {
    slave_select: PinSpec,
    reset: PinSpec,
}

impl Default for PinsFile {
    fn default() -> Self {
        let pins = PinConfig::default();
        Self {
            slave_select: PinSpec::Number(pins.slave_select),
            reset: PinSpec::Number(pins.reset),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    pins: PinsFile,
    spi: SpiConfig,
    timing: TimingConfig,
    strict_checksum: bool,
}

impl ConfigFile {
    fn into_lens_config(self) -> Result<LensConfig> {
        Ok(LensConfig {
            pins: PinConfig {
                slave_select: self.pins.slave_select.resolve("slave_select")?,
                reset: self.pins.reset.resolve("reset")?,
            },
            spi: self.spi,
            timing: self.timing,
            strict_checksum: self.strict_checksum,
        })
    }
}

/// Parse configuration from TOML text
pub fn parse_config(text: &str) -> Result<LensConfig> {
    let file: ConfigFile = toml::from_str(text).context("invalid configuration")?;
    file.into_lens_config()
}

/// Load configuration, falling back to defaults when no path is given
pub fn load(path: Option<&Path>) -> Result<LensConfig> {
    let Some(path) = path else {
        debug!("no config file given, using defaults");
        return Ok(LensConfig::default());
    };

    debug!("loading config from {}", path.display());
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_config(&text).with_context(|| format!("in {}", path.display()))
}
