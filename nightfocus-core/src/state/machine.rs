//! State machine definition

use super::events::SessionEvent;

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// No operation in flight
    #[default]
    Idle,
    /// An operation is driving the hardware
    Busy,
    /// The last operation failed; the adapter may be mid-move
    ErrorRaised,
}

impl SessionState {
    /// Check if this is the error state
    pub fn is_error(&self) -> bool {
        matches!(self, SessionState::ErrorRaised)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: SessionEvent) -> Self {
        use SessionEvent::*;
        use SessionState::*;

        match (self, event) {
            // A new operation may start after success or after a failure
            (Idle, OperationStarted) => Busy,
            (ErrorRaised, OperationStarted) => Busy,

            (Busy, OperationCompleted) => Idle,
            (Busy, OperationFailed) => ErrorRaised,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_round_trip() {
        let state = SessionState::Idle
            .transition(SessionEvent::OperationStarted)
            .transition(SessionEvent::OperationCompleted);
        assert_eq!(state, SessionState::Idle);
    }

    #[test]
    fn test_failure_then_recovery() {
        let failed = SessionState::Idle
            .transition(SessionEvent::OperationStarted)
            .transition(SessionEvent::OperationFailed);
        assert!(failed.is_error());

        let busy = failed.transition(SessionEvent::OperationStarted);
        assert_eq!(busy, SessionState::Busy);
        assert_eq!(busy.transition(SessionEvent::OperationCompleted), SessionState::Idle);
    }

    #[test]
    fn test_ignored_events() {
        assert_eq!(
            SessionState::Idle.transition(SessionEvent::OperationCompleted),
            SessionState::Idle
        );
        assert_eq!(
            SessionState::ErrorRaised.transition(SessionEvent::OperationCompleted),
            SessionState::ErrorRaised
        );
        assert_eq!(
            SessionState::Busy.transition(SessionEvent::OperationStarted),
            SessionState::Busy
        );
    }
}
