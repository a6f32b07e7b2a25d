//! Recording test rig
//!
//! Bus, pins, delay and platform all append to one shared event log so
//! tests can assert the exact interleaving of pin edges, transfers and
//! waits.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use nightfocus_core::LensConfig;
use nightfocus_hal::{CapabilityError, DelayMs, OutputPin, Platform, SpiBus, SpiConfig};

use crate::{Sequencer, Transport};

pub const SS_PIN: u8 = 5;
pub const RESET_PIN: u8 = 6;

/// Non-sentinel response with a deliberately wrong checksum
pub const DEFAULT_RESPONSE: [u8; 4] = [0x10, 0x20, 0x30, 0x40];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Acquired(u8),
    BusOpened,
    Low(u8),
    High(u8),
    PinFault(u8),
    Transfer([u8; 4]),
    TransferFault([u8; 4]),
    Delay(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockFault;

impl fmt::Display for MockFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("mock fault")
    }
}

#[derive(Default)]
struct Shared {
    events: Vec<Event>,
    responses: VecDeque<[u8; 4]>,
    fail_transfers: usize,
    /// (pin, writes to let through before failing)
    pin_faults: Vec<(u8, usize)>,
}

#[derive(Clone, Default)]
pub struct Rig {
    shared: Rc<RefCell<Shared>>,
}

impl Rig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.shared.borrow().events.clone()
    }

    pub fn clear(&self) {
        self.shared.borrow_mut().events.clear();
    }

    /// Frames sent, in order (faulted transfers included)
    pub fn transfers(&self) -> Vec<[u8; 4]> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Transfer(bytes) | Event::TransferFault(bytes) => Some(bytes),
                _ => None,
            })
            .collect()
    }

    pub fn delays(&self) -> Vec<u32> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Delay(ms) => Some(ms),
                _ => None,
            })
            .collect()
    }

    /// Queue a response for the next transfer
    pub fn respond(&self, bytes: [u8; 4]) {
        self.shared.borrow_mut().responses.push_back(bytes);
    }

    pub fn fail_next_transfer(&self) {
        self.shared.borrow_mut().fail_transfers += 1;
    }

    pub fn fail_next_pin_write(&self, pin: u8) {
        self.fail_pin_write(pin, 0);
    }

    /// Fail a later write to `pin`, after `skip` writes have succeeded
    pub fn fail_pin_write(&self, pin: u8, skip: usize) {
        self.shared.borrow_mut().pin_faults.push((pin, skip));
    }

    fn log(&self, event: Event) {
        self.shared.borrow_mut().events.push(event);
    }

    pub fn bus(&self) -> MockBus {
        MockBus { rig: self.clone() }
    }

    pub fn pin(&self, id: u8) -> MockPin {
        MockPin {
            rig: self.clone(),
            id,
            high: true,
        }
    }

    pub fn delay(&self) -> MockDelay {
        MockDelay { rig: self.clone() }
    }

    pub fn transport(&self) -> Transport<MockBus, MockPin> {
        Transport::new(self.bus(), self.pin(SS_PIN)).unwrap()
    }

    pub fn sequencer(&self, config: &LensConfig) -> Sequencer<MockBus, MockPin, MockDelay> {
        Sequencer::new(self.transport(), self.pin(RESET_PIN), self.delay(), config)
    }

    pub fn platform(&self, supported: bool) -> MockPlatform {
        MockPlatform {
            rig: self.clone(),
            supported,
        }
    }
}

pub struct MockBus {
    rig: Rig,
}

impl SpiBus for MockBus {
    type Error = MockFault;

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), MockFault> {
        let sent: [u8; 4] = write.try_into().expect("frames are 4 bytes");
        let mut shared = self.rig.shared.borrow_mut();
        if shared.fail_transfers > 0 {
            shared.fail_transfers -= 1;
            shared.events.push(Event::TransferFault(sent));
            return Err(MockFault);
        }
        let response = shared.responses.pop_front().unwrap_or(DEFAULT_RESPONSE);
        read.copy_from_slice(&response);
        shared.events.push(Event::Transfer(sent));
        Ok(())
    }
}

pub struct MockPin {
    rig: Rig,
    id: u8,
    high: bool,
}

impl MockPin {
    fn write(&mut self, high: bool) -> Result<(), MockFault> {
        let mut shared = self.rig.shared.borrow_mut();
        let mut fault = false;
        shared.pin_faults.retain_mut(|(pin, skip)| {
            if *pin != self.id {
                return true;
            }
            if *skip == 0 {
                fault = true;
                return false;
            }
            *skip -= 1;
            true
        });
        if fault {
            shared.events.push(Event::PinFault(self.id));
            return Err(MockFault);
        }
        self.high = high;
        shared.events.push(if high {
            Event::High(self.id)
        } else {
            Event::Low(self.id)
        });
        Ok(())
    }
}

impl OutputPin for MockPin {
    type Error = MockFault;

    fn set_high(&mut self) -> Result<(), MockFault> {
        self.write(true)
    }

    fn set_low(&mut self) -> Result<(), MockFault> {
        self.write(false)
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

pub struct MockDelay {
    rig: Rig,
}

impl DelayMs for MockDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.rig.log(Event::Delay(ms));
    }
}

pub struct MockPlatform {
    rig: Rig,
    supported: bool,
}

impl Platform for MockPlatform {
    type Error = MockFault;
    type Bus = MockBus;
    type Pin = MockPin;
    type Delay = MockDelay;

    fn probe(&self) -> Result<(), CapabilityError> {
        if self.supported {
            Ok(())
        } else {
            Err(CapabilityError::new("mock host has no GPIO"))
        }
    }

    fn open_bus(&mut self, _config: &SpiConfig) -> Result<MockBus, MockFault> {
        self.rig.log(Event::BusOpened);
        Ok(self.rig.bus())
    }

    fn output_pin(&mut self, pin: u8) -> Result<MockPin, MockFault> {
        self.rig.log(Event::Acquired(pin));
        Ok(self.rig.pin(pin))
    }

    fn delay(&mut self) -> MockDelay {
        self.rig.delay()
    }
}
