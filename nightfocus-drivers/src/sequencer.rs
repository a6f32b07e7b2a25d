//! Command sequencer
//!
//! Each lens intent is one or two exchanges plus the settle time the
//! mechanism needs before it can take another command:
//!
//! | Intent   | Exchanges                         | Wait                     |
//! |----------|-----------------------------------|--------------------------|
//! | OPEN     | `O 0`                             | open settle after        |
//! | IDLE     | `I 0`                             | none                     |
//! | FOCUS    | `F v`, then settle frame          | command settle between   |
//! | APERTURE | `A v`, then settle frame          | command settle between   |
//! | RESET    | none (reset line pulse)           | pulse, then reset settle |
//!
//! A sentinel response after any exchange fails the whole intent. Nothing
//! is rolled back: if the first exchange already moved the mechanism, the
//! caller re-homes with a reset.

use core::fmt;

use log::{debug, error, warn};

use nightfocus_core::{
    Aperture, Command, LensConfig, LensError, ProtocolError, SessionEvent, SessionState,
    TimingConfig, ValidationError, MAX_FOCUS, MIN_FOCUS,
};
use nightfocus_hal::{DelayMs, OutputPin, SpiBus};
use nightfocus_protocol::{CommandFrame, Opcode, Response};

use crate::reset;
use crate::transport::Transport;

/// Lens command sequencer
///
/// Owns the transport, the reset line and the delay source.
pub struct Sequencer<S, P, D> {
    transport: Transport<S, P>,
    reset_pin: P,
    delay: D,
    timing: TimingConfig,
    strict_checksum: bool,
    state: SessionState,
}

impl<S, P, D> Sequencer<S, P, D>
where
    S: SpiBus,
    S::Error: fmt::Debug + fmt::Display,
    P: OutputPin<Error = S::Error>,
    D: DelayMs,
{
    /// Create a new sequencer
    pub fn new(transport: Transport<S, P>, reset_pin: P, delay: D, config: &LensConfig) -> Self {
        Self {
            transport,
            reset_pin,
            delay,
            timing: config.timing,
            strict_checksum: config.strict_checksum,
            state: SessionState::Idle,
        }
    }

    /// Get the current session state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Initialise the mechanical stage
    ///
    /// Blocks for the open settle delay after the exchange.
    pub fn open(&mut self) -> Result<(), LensError<S::Error>> {
        debug!("command O: 0");
        self.tracked(|s| {
            s.send(CommandFrame::encode(Opcode::Open, 0))?;
            s.delay.delay_ms(s.timing.open_settle_ms);
            Ok(())
        })
    }

    /// Return the adapter to its safe idle state
    pub fn idle(&mut self) -> Result<(), LensError<S::Error>> {
        debug!("command I: 0");
        self.tracked(|s| s.send(CommandFrame::encode(Opcode::Idle, 0)).map(|_| ()))
    }

    /// Move focus to `value`
    ///
    /// Values outside `MIN_FOCUS..=MAX_FOCUS` are rejected before anything
    /// is sent.
    pub fn set_focus(&mut self, value: u16) -> Result<(), LensError<S::Error>> {
        if !(MIN_FOCUS..=MAX_FOCUS).contains(&value) {
            let err = ValidationError::FocusOutOfRange(value as u32);
            warn!("{}", err);
            return Err(err.into());
        }
        self.move_and_settle(Opcode::Focus, value)
    }

    /// Move the aperture to a calibrated stop
    pub fn set_aperture(&mut self, stop: Aperture) -> Result<(), LensError<S::Error>> {
        self.move_and_settle(Opcode::Aperture, stop.value())
    }

    /// Move the aperture to a stop given by name (`"V3"`, `"MAX"`, ...)
    pub fn set_aperture_named(&mut self, name: &str) -> Result<(), LensError<S::Error>> {
        let Some(stop) = Aperture::from_name(name) else {
            warn!("unknown aperture {:?}", name);
            return Err(ValidationError::InvalidValue.into());
        };
        self.set_aperture(stop)
    }

    /// Pulse the hardware reset line
    pub fn reset(&mut self) -> Result<(), LensError<S::Error>> {
        self.tracked(|s| {
            reset::pulse(&mut s.reset_pin, &mut s.delay, &s.timing).map_err(|e| {
                error!("reset line fault: {}", e);
                LensError::Transport(e)
            })
        })
    }

    /// Power-cycled focus: reset, open, focus, reset
    ///
    /// Pauses between steps let the stage finish each phase. The range is
    /// checked before the first reset.
    pub fn cycle_focus(&mut self, value: u16) -> Result<(), LensError<S::Error>> {
        if !(MIN_FOCUS..=MAX_FOCUS).contains(&value) {
            return Err(ValidationError::FocusOutOfRange(value as u32).into());
        }
        let pause = self.timing.cycle_pause_ms;

        self.reset()?;
        self.delay.delay_ms(pause);
        self.open()?;
        self.delay.delay_ms(pause);
        self.set_focus(value)?;
        self.delay.delay_ms(pause);
        self.reset()
    }

    /// Execute a parsed command
    pub fn execute(&mut self, command: Command) -> Result<(), LensError<S::Error>> {
        match command {
            Command::Open => self.open(),
            Command::Idle => self.idle(),
            Command::Focus(value) => self.set_focus(value),
            Command::Aperture(stop) => self.set_aperture(stop),
            Command::Reset => self.reset(),
        }
    }

    /// Move command followed by the settle frame
    fn move_and_settle(&mut self, opcode: Opcode, value: u16) -> Result<(), LensError<S::Error>> {
        debug!("command {}: {}", opcode.as_char(), value);
        self.tracked(|s| {
            s.send(CommandFrame::encode(opcode, value))?;
            s.delay.delay_ms(s.timing.command_settle_ms);
            s.send(CommandFrame::settle())?;
            Ok(())
        })
    }

    /// Single exchange with response validation
    fn send(&mut self, frame: CommandFrame) -> Result<Response, LensError<S::Error>> {
        let response = self.transport.exchange(&frame).map_err(|e| {
            error!("transport fault sending {}: {}", frame, e);
            LensError::Transport(e)
        })?;

        if let Err(cause) = response.check(self.strict_checksum) {
            error!("received invalid response {} to {}: {}", response, frame, cause);
            return Err(ProtocolError {
                frame,
                response,
                cause,
            }
            .into());
        }

        Ok(response)
    }

    /// Run a hardware operation, keeping the session state in step
    fn tracked<T, F>(&mut self, op: F) -> Result<T, LensError<S::Error>>
    where
        F: FnOnce(&mut Self) -> Result<T, LensError<S::Error>>,
    {
        self.state = self.state.transition(SessionEvent::OperationStarted);
        let result = op(self);
        let event = if result.is_ok() {
            SessionEvent::OperationCompleted
        } else {
            SessionEvent::OperationFailed
        };
        self.state = self.state.transition(event);
        result
    }
}
