//! Blocking delays
//!
//! Every settle period in the lens protocol is a blocking wait on the
//! calling thread.

/// Blocking millisecond delay
pub trait DelayMs {
    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}
