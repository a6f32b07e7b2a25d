//! Raspberry Pi platform

use log::{debug, info};
use nightfocus_hal::{CapabilityError, Platform, SpiConfig};
use rppal::gpio::Gpio;
use rppal::system::DeviceInfo;

use crate::gpio::{GpioAllocator, RpiOutputPin};
use crate::{RpiError, RpiSpi, StdDelay};

/// Raspberry Pi GPIO and SPI
///
/// The GPIO controller is opened on the first pin request, so constructing
/// the platform never touches hardware.
#[derive(Default)]
pub struct RpiPlatform {
    gpio: Option<Gpio>,
    pins: GpioAllocator,
}

impl RpiPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    fn gpio(&mut self) -> Result<&Gpio, RpiError> {
        let gpio = match self.gpio.take() {
            Some(gpio) => gpio,
            None => {
                debug!("opening gpio controller");
                Gpio::new()?
            }
        };
        Ok(self.gpio.insert(gpio))
    }
}

impl Platform for RpiPlatform {
    type Error = RpiError;
    type Bus = RpiSpi;
    type Pin = RpiOutputPin;
    type Delay = StdDelay;

    fn probe(&self) -> Result<(), CapabilityError> {
        match DeviceInfo::new() {
            Ok(info) => {
                info!("running on {}", info.model());
                Ok(())
            }
            Err(_) => Err(CapabilityError::new(
                "GPIO/SPI unavailable: not running on a Raspberry Pi",
            )),
        }
    }

    fn open_bus(&mut self, config: &SpiConfig) -> Result<Self::Bus, Self::Error> {
        debug!(
            "opening spidev{}.{} at {} Hz",
            config.bus, config.device, config.frequency
        );
        RpiSpi::open(config)
    }

    fn output_pin(&mut self, pin: u8) -> Result<Self::Pin, Self::Error> {
        self.pins
            .allocate(pin)
            .map_err(|source| RpiError::Pin { pin, source })?;

        let line = self
            .gpio()
            .and_then(|gpio| gpio.get(pin).map_err(RpiError::from));
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                self.pins.release(pin);
                return Err(e);
            }
        };
        Ok(RpiOutputPin::new(line.into_output_high()))
    }

    fn delay(&mut self) -> Self::Delay {
        StdDelay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_pin_off_header_before_opening_gpio() {
        let mut platform = RpiPlatform::new();
        let err = platform.output_pin(40).unwrap_err();
        assert!(matches!(
            err,
            RpiError::Pin {
                pin: 40,
                source: crate::PinError::OutOfRange
            }
        ));
        assert!(platform.gpio.is_none());
    }
}
