//! Blocking delays

use std::thread;
use std::time::Duration;

use nightfocus_hal::DelayMs;

/// Delay that parks the calling thread
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayMs for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
