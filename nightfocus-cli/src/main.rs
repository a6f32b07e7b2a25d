//! nightfocus - lens adapter control
//!
//! Sends one command to the adapter, then returns it to idle:
//!
//! ```text
//! nightfocus O            # initialise the stage
//! nightfocus F 470        # move focus
//! nightfocus A V3         # move aperture to a calibrated stop
//! nightfocus I            # idle
//! nightfocus R            # pulse the reset line
//! nightfocus --cycle 470  # reset, open, focus, reset
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser};
use log::{info, warn, LevelFilter};

use nightfocus_core::Command;
use nightfocus_drivers::Session;
use nightfocus_hal_rpi::RpiPlatform;

mod config;

#[derive(Debug, Parser)]
#[command(name = "nightfocus", version, about = "Drive an SPI-attached lens adapter")]
struct Cli {
    /// Command letter: O (open), I (idle), F (focus), A (aperture), R (reset)
    #[arg(required_unless_present = "cycle")]
    command: Option<char>,

    /// Command value: focus step, or aperture stop (V0..V11, MAX, MIN)
    value: Option<String>,

    /// Power-cycle the adapter and move focus to this step
    #[arg(long, value_name = "STEP", conflicts_with_all = ["command", "value"])]
    cycle: Option<u16>,

    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Reject responses whose checksum does not match
    #[arg(long)]
    strict_checksum: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// What the invocation asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Single(Command),
    Cycle(u16),
}

impl Cli {
    /// Resolve the arguments without touching hardware
    fn action(&self) -> Result<Action> {
        if let Some(step) = self.cycle {
            return Ok(Action::Cycle(step));
        }
        let letter = self
            .command
            .ok_or_else(|| anyhow!("no command given"))?;
        let command = Command::parse(letter, self.value.as_deref())
            .with_context(|| format!("invalid command {letter}"))?;
        Ok(Action::Single(command))
    }

    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let action = cli.action()?;

    let mut config = config::load(cli.config.as_deref())?;
    if cli.strict_checksum {
        config.strict_checksum = true;
    }

    let mut platform = RpiPlatform::new();
    let mut session = Session::open(&mut platform, &config).context("failed to open adapter")?;

    let result = match action {
        Action::Single(Command::Reset) => session.reset().context("reset failed"),
        Action::Single(command) => {
            info!("sending {}", command);
            session
                .run(|lens| lens.execute(command))
                .with_context(|| format!("{command} failed"))
        }
        Action::Cycle(step) => {
            info!("power-cycled focus to {}", step);
            session
                .run(|lens| lens.cycle_focus(step))
                .context("power-cycled focus failed")
        }
    };

    if result.is_err() && session.state().is_error() {
        warn!("adapter did not return to idle; re-home it with `nightfocus R`");
    }
    result?;

    info!("done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nightfocus_core::{Aperture, ValidationError};

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("nightfocus").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_focus_command() {
        assert_eq!(cli(&["F", "470"]).action().unwrap(), Action::Single(Command::Focus(470)));
    }

    #[test]
    fn test_aperture_by_name() {
        assert_eq!(
            cli(&["A", "v3"]).action().unwrap(),
            Action::Single(Command::Aperture(Aperture::V3))
        );
    }

    #[test]
    fn test_missing_value_reads_zero() {
        assert_eq!(cli(&["O"]).action().unwrap(), Action::Single(Command::Open));
        assert_eq!(cli(&["F"]).action().unwrap(), Action::Single(Command::Focus(0)));
    }

    #[test]
    fn test_unknown_letter_rejected_before_hardware() {
        let err = cli(&["X"]).action().unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::UnknownCommand('X'))
        );
    }

    #[test]
    fn test_cycle() {
        assert_eq!(cli(&["--cycle", "470"]).action().unwrap(), Action::Cycle(470));
    }

    #[test]
    fn test_cycle_conflicts_with_command() {
        let args = ["nightfocus", "--cycle", "470", "F", "100"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_command_required() {
        assert!(Cli::try_parse_from(["nightfocus"]).is_err());
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(cli(&["I"]).log_level(), LevelFilter::Info);
        assert_eq!(cli(&["-v", "I"]).log_level(), LevelFilter::Debug);
        assert_eq!(cli(&["-vv", "I"]).log_level(), LevelFilter::Trace);
    }
}
