//! Session events
//!
//! Events are raised by the sequencer around every hardware operation.

/// Session events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionEvent {
    /// An operation is about to drive the bus or a pin
    OperationStarted,
    /// The operation finished and every response was accepted
    OperationCompleted,
    /// The operation faulted or the adapter answered with an error
    OperationFailed,
}
