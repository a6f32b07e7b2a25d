//! Session lifecycle
//!
//! A session is the only way callers reach the sequencer. It checks the
//! configuration and the host before acquiring anything, and it sends IDLE
//! after every batch of operations, whether the batch succeeded, failed, or
//! panicked.

use core::fmt;

use log::{debug, error, warn};

use nightfocus_core::{LensConfig, LensError, SessionState};
use nightfocus_hal::{DelayMs, OutputPin, Platform, SpiBus};

use crate::sequencer::Sequencer;
use crate::transport::Transport;

/// Lens session
pub struct Session<S, P, D>
where
    S: SpiBus,
    S::Error: fmt::Debug + fmt::Display,
    P: OutputPin<Error = S::Error>,
    D: DelayMs,
{
    sequencer: Sequencer<S, P, D>,
}

impl<S, P, D> Session<S, P, D>
where
    S: SpiBus,
    S::Error: fmt::Debug + fmt::Display,
    P: OutputPin<Error = S::Error>,
    D: DelayMs,
{
    /// Wrap an already-built sequencer
    pub fn new(sequencer: Sequencer<S, P, D>) -> Self {
        Self { sequencer }
    }

    /// Validate `config`, probe the platform, then acquire the bus and both
    /// pins
    ///
    /// Fails with [`LensError::Config`] or [`LensError::Capability`] before
    /// touching any pin.
    pub fn open<Pl>(platform: &mut Pl, config: &LensConfig) -> Result<Self, LensError<S::Error>>
    where
        Pl: Platform<Error = S::Error, Bus = S, Pin = P, Delay = D>,
    {
        if let Err(e) = config.validate() {
            error!("invalid configuration: {}", e);
            return Err(e.into());
        }
        if let Err(e) = platform.probe() {
            error!("{}", e);
            return Err(e.into());
        }

        debug!("opening gpio / spi");
        let slave_select = platform
            .output_pin(config.pins.slave_select)
            .map_err(LensError::Transport)?;
        let reset_pin = platform
            .output_pin(config.pins.reset)
            .map_err(LensError::Transport)?;
        let bus = platform
            .open_bus(&config.spi)
            .map_err(LensError::Transport)?;
        let delay = platform.delay();

        let transport = Transport::new(bus, slave_select).map_err(LensError::Transport)?;
        Ok(Self::new(Sequencer::new(transport, reset_pin, delay, config)))
    }

    /// Run a batch of operations, then send IDLE
    ///
    /// IDLE is sent exactly once, after `body` returns or while it unwinds.
    /// If `body` failed, its error is returned even when IDLE fails too; an
    /// IDLE failure is only returned when `body` succeeded.
    pub fn run<T, F>(&mut self, body: F) -> Result<T, LensError<S::Error>>
    where
        F: FnOnce(&mut Sequencer<S, P, D>) -> Result<T, LensError<S::Error>>,
    {
        let mut guard = IdleOnUnwind {
            sequencer: &mut self.sequencer,
            armed: true,
        };
        let outcome = body(&mut *guard.sequencer);
        guard.armed = false;

        debug!("session: sending idle command");
        let idled = guard.sequencer.idle();

        match (outcome, idled) {
            (Ok(value), Ok(())) => {
                debug!("session: idle command sent");
                Ok(value)
            }
            (Ok(_), Err(idle_err)) => Err(idle_err),
            (Err(e), Ok(())) => {
                report(&e);
                Err(e)
            }
            (Err(e), Err(idle_err)) => {
                warn!("idle after failure also failed: {}", idle_err);
                report(&e);
                Err(e)
            }
        }
    }

    /// Pulse the hardware reset line
    ///
    /// Pin-only; no IDLE follows.
    pub fn reset(&mut self) -> Result<(), LensError<S::Error>> {
        self.sequencer.reset()
    }

    /// Get the current session state
    pub fn state(&self) -> SessionState {
        self.sequencer.state()
    }
}

fn report<E: fmt::Display>(e: &LensError<E>) {
    if e.is_pre_transfer() {
        warn!("{}", e);
    } else {
        error!("{}", e);
    }
}

/// Sends IDLE if a batch body unwinds before disarming it
struct IdleOnUnwind<'a, S, P, D>
where
    S: SpiBus,
    S::Error: fmt::Debug + fmt::Display,
    P: OutputPin<Error = S::Error>,
    D: DelayMs,
{
    sequencer: &'a mut Sequencer<S, P, D>,
    armed: bool,
}

impl<S, P, D> Drop for IdleOnUnwind<'_, S, P, D>
where
    S: SpiBus,
    S::Error: fmt::Debug + fmt::Display,
    P: OutputPin<Error = S::Error>,
    D: DelayMs,
{
    fn drop(&mut self) {
        if self.armed {
            warn!("batch aborted, sending idle");
            if let Err(e) = self.sequencer.idle() {
                error!("idle after aborted batch failed: {}", e);
            }
        }
    }
}
