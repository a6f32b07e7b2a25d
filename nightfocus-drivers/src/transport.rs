//! Chip-select-guarded SPI exchange
//!
//! The adapter only listens while its slave-select line is low. Each
//! exchange asserts the line, clocks one frame out (and one response in),
//! and deasserts the line again, on every exit path:
//!
//! ```text
//! SS   ‾‾‾‾\________________/‾‾‾‾
//! MOSI      | OP | HI | LO | CRC |
//! MISO      | R0 | R1 | R2 | R3  |
//! ```

use log::{debug, warn};

use nightfocus_hal::{OutputPin, SpiBus};
use nightfocus_protocol::{CommandFrame, Response, FRAME_LEN};

/// Asserted slave-select line
///
/// Dropping the guard without calling [`release`](Selected::release)
/// (early return, panic) still drives the line high.
struct Selected<'a, P: OutputPin> {
    pin: &'a mut P,
    released: bool,
}

impl<'a, P: OutputPin> Selected<'a, P> {
    fn assert(pin: &'a mut P) -> Result<Self, P::Error> {
        if let Err(e) = pin.set_low() {
            // State of the line is unknown; try to leave it deasserted
            if pin.set_high().is_err() {
                warn!("failed to deassert slave-select after assert fault");
            }
            return Err(e);
        }
        Ok(Self {
            pin,
            released: false,
        })
    }

    /// Deassert the line
    ///
    /// If the write fails the guard is dropped unreleased, so the deassert
    /// is retried once before the error reaches the caller.
    fn release(mut self) -> Result<(), P::Error> {
        self.pin.set_high()?;
        self.released = true;
        Ok(())
    }
}

impl<P: OutputPin> Drop for Selected<'_, P> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match self.pin.set_high() {
            Ok(()) => debug!("slave-select deasserted after aborted exchange"),
            Err(_) => warn!("failed to deassert slave-select, line may still be asserted"),
        }
    }
}

/// Exclusive owner of the SPI bus and the slave-select line
///
/// Every operation takes `&mut self`, so at most one exchange is ever in
/// flight. The handles are released when the transport is dropped.
pub struct Transport<S, P> {
    bus: S,
    slave_select: P,
}

impl<S, P> Transport<S, P>
where
    S: SpiBus,
    P: OutputPin<Error = S::Error>,
{
    /// Take ownership of the bus and slave-select line
    ///
    /// The line is driven high (deasserted) immediately.
    pub fn new(bus: S, mut slave_select: P) -> Result<Self, S::Error> {
        slave_select.set_high()?;
        Ok(Self { bus, slave_select })
    }

    /// Send one frame and return the bytes clocked back
    ///
    /// Blocks for the duration of the transfer. Sentinel detection is left
    /// to the caller.
    pub fn exchange(&mut self, frame: &CommandFrame) -> Result<Response, S::Error> {
        debug!("command message: {}", frame);

        let mut read = [0u8; FRAME_LEN];
        let selected = Selected::assert(&mut self.slave_select)?;
        // On error the guard drops here and deasserts the line
        self.bus.transfer(&mut read, frame.as_bytes())?;
        selected.release()?;

        let response = Response::new(read);
        debug!("response: {}", response);
        Ok(response)
    }

    /// Whether the slave-select line is currently deasserted
    pub fn is_deselected(&self) -> bool {
        self.slave_select.is_set_high()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Event, Rig, SS_PIN};
    use nightfocus_protocol::Opcode;

    #[test]
    fn test_new_deasserts_slave_select() {
        let rig = Rig::new();
        let transport = rig.transport();
        assert!(transport.is_deselected());
        assert_eq!(rig.events(), vec![Event::High(SS_PIN)]);
    }

    #[test]
    fn test_exchange_select_discipline() {
        let rig = Rig::new();
        let mut transport = rig.transport();
        rig.clear();
        rig.respond([9, 8, 7, 6]);

        let frame = CommandFrame::encode(Opcode::Open, 0);
        let response = transport.exchange(&frame).unwrap();

        assert_eq!(response.as_bytes(), &[9, 8, 7, 6]);
        assert_eq!(
            rig.events(),
            vec![
                Event::Low(SS_PIN),
                Event::Transfer(*frame.as_bytes()),
                Event::High(SS_PIN),
            ]
        );
    }

    #[test]
    fn test_exchange_deasserts_on_bus_fault() {
        let rig = Rig::new();
        let mut transport = rig.transport();
        rig.clear();
        rig.fail_next_transfer();

        let frame = CommandFrame::encode(Opcode::Idle, 0);
        assert!(transport.exchange(&frame).is_err());

        assert_eq!(
            rig.events(),
            vec![
                Event::Low(SS_PIN),
                Event::TransferFault(*frame.as_bytes()),
                Event::High(SS_PIN),
            ]
        );
        assert!(transport.is_deselected());
    }

    #[test]
    fn test_exchange_deasserts_when_assert_fails() {
        let rig = Rig::new();
        let mut transport = rig.transport();
        rig.clear();
        rig.fail_next_pin_write(SS_PIN);

        let frame = CommandFrame::encode(Opcode::Idle, 0);
        assert!(transport.exchange(&frame).is_err());

        // No transfer was attempted and the line was left high
        assert_eq!(rig.events(), vec![Event::PinFault(SS_PIN), Event::High(SS_PIN)]);
        assert!(transport.is_deselected());
    }

    #[test]
    fn test_failed_deassert_is_retried() {
        let rig = Rig::new();
        let mut transport = rig.transport();
        rig.clear();
        // Let the assert through, fail the deassert that follows
        rig.fail_pin_write(SS_PIN, 1);

        let frame = CommandFrame::encode(Opcode::Focus, 10);
        assert!(transport.exchange(&frame).is_err());

        assert_eq!(
            rig.events(),
            vec![
                Event::Low(SS_PIN),
                Event::Transfer(*frame.as_bytes()),
                Event::PinFault(SS_PIN),
                Event::High(SS_PIN),
            ]
        );
        assert!(transport.is_deselected());
    }

    #[test]
    fn test_deassert_retry_failure_is_reported() {
        let rig = Rig::new();
        let mut transport = rig.transport();
        rig.clear();
        rig.fail_pin_write(SS_PIN, 1);
        rig.fail_pin_write(SS_PIN, 2);

        let frame = CommandFrame::encode(Opcode::Focus, 10);
        assert!(transport.exchange(&frame).is_err());

        assert_eq!(
            rig.events(),
            vec![
                Event::Low(SS_PIN),
                Event::Transfer(*frame.as_bytes()),
                Event::PinFault(SS_PIN),
                Event::PinFault(SS_PIN),
            ]
        );
        assert!(!transport.is_deselected());
    }

    #[test]
    fn test_one_select_cycle_per_exchange() {
        let rig = Rig::new();
        let mut transport = rig.transport();
        rig.clear();

        for value in [1u16, 2, 3] {
            transport
                .exchange(&CommandFrame::encode(Opcode::Focus, value))
                .unwrap();
        }

        let events = rig.events();
        let lows = events.iter().filter(|e| **e == Event::Low(SS_PIN)).count();
        let highs = events.iter().filter(|e| **e == Event::High(SS_PIN)).count();
        assert_eq!((lows, highs), (3, 3));
    }
}
