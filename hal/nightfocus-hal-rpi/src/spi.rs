//! spidev-backed SPI bus

use log::trace;
use nightfocus_hal::{Mode, SpiBus, SpiConfig};
use rppal::spi::{self, Bus, SlaveSelect, Spi};

use crate::RpiError;

/// SPI device opened through `/dev/spidevB.D`
///
/// The kernel drives the hardware chip-select for `device`; the adapter's
/// own select line is a separate GPIO.
#[derive(Debug)]
pub struct RpiSpi {
    spi: Spi,
}

impl RpiSpi {
    /// Open the device named by `config`
    pub fn open(config: &SpiConfig) -> Result<Self, RpiError> {
        let bus = bus(config.bus)?;
        let slave_select = slave_select(config.device)?;
        let spi = Spi::new(bus, slave_select, config.frequency, mode(config.mode))?;
        Ok(Self { spi })
    }
}

impl SpiBus for RpiSpi {
    type Error = RpiError;

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        let actual = self.spi.transfer(read, write)?;
        trace!("spi: {:02x?} -> {:02x?}", write, read);
        if actual != write.len() {
            return Err(RpiError::ShortTransfer {
                expected: write.len(),
                actual,
            });
        }
        Ok(())
    }
}

fn bus(index: u8) -> Result<Bus, RpiError> {
    Ok(match index {
        0 => Bus::Spi0,
        1 => Bus::Spi1,
        2 => Bus::Spi2,
        3 => Bus::Spi3,
        4 => Bus::Spi4,
        5 => Bus::Spi5,
        6 => Bus::Spi6,
        other => return Err(RpiError::UnknownBus(other)),
    })
}

fn slave_select(index: u8) -> Result<SlaveSelect, RpiError> {
    Ok(match index {
        0 => SlaveSelect::Ss0,
        1 => SlaveSelect::Ss1,
        2 => SlaveSelect::Ss2,
        3 => SlaveSelect::Ss3,
        4 => SlaveSelect::Ss4,
        5 => SlaveSelect::Ss5,
        6 => SlaveSelect::Ss6,
        7 => SlaveSelect::Ss7,
        8 => SlaveSelect::Ss8,
        9 => SlaveSelect::Ss9,
        10 => SlaveSelect::Ss10,
        11 => SlaveSelect::Ss11,
        12 => SlaveSelect::Ss12,
        13 => SlaveSelect::Ss13,
        14 => SlaveSelect::Ss14,
        15 => SlaveSelect::Ss15,
        other => return Err(RpiError::UnknownDevice(other)),
    })
}

fn mode(mode: Mode) -> spi::Mode {
    match mode {
        Mode::Mode0 => spi::Mode::Mode0,
        Mode::Mode1 => spi::Mode::Mode1,
        Mode::Mode2 => spi::Mode::Mode2,
        Mode::Mode3 => spi::Mode::Mode3,
    }
}
