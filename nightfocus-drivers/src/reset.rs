//! Hardware reset pulse
//!
//! Independent of the SPI protocol: the adapter is reset by holding its
//! reset line low for a short pulse, then given time to boot.
//!
//! ```text
//! RESET ‾‾‾‾\____________/‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾
//!           |<- pulse  ->|<- settle ->| ready
//! ```

use log::{debug, warn};

use nightfocus_core::TimingConfig;
use nightfocus_hal::{DelayMs, OutputPin};

/// Pulse the reset line and wait for the adapter to come back
///
/// The line is high again when this returns, whether or not it succeeded.
pub fn pulse<P, D>(pin: &mut P, delay: &mut D, timing: &TimingConfig) -> Result<(), P::Error>
where
    P: OutputPin,
    D: DelayMs,
{
    debug!("resetting adapter");

    if let Err(e) = pin.set_low() {
        if pin.set_high().is_err() {
            warn!("failed to release reset line after assert fault");
        }
        return Err(e);
    }
    delay.delay_ms(timing.reset_pulse_ms);
    pin.set_high()?;

    delay.delay_ms(timing.reset_settle_ms);
    debug!("adapter reset");
    Ok(())
}
