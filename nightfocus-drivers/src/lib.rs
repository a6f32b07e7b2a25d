//! Lens adapter driver
//!
//! This crate turns lens intents into bus traffic, built from the
//! traits in `nightfocus-hal`:
//!
//! - [`Transport`]: one chip-select-guarded 4-byte exchange
//! - [`Sequencer`]: open/idle/focus/aperture/reset with settle timing and
//!   sentinel detection
//! - [`Session`]: capability check on open, idle-on-exit around every
//!   batch of operations
//!
//! # Usage
//!
//! ```ignore
//! let mut session = Session::open(&mut platform, &config)?;
//! session.run(|lens| {
//!     lens.open()?;
//!     lens.set_focus(470)?;
//!     lens.set_aperture(Aperture::V3)
//! })?;
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod reset;
pub mod sequencer;
pub mod session;
pub mod transport;

#[cfg(test)]
mod testing;

pub use sequencer::Sequencer;
pub use session::Session;
pub use transport::Transport;
