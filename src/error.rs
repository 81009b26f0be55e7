//! Error types for timer operations

use thiserror::Error;

use crate::state::TimerStatus;

/// Errors raised by the timer engine, its tick handle and the controller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// A transition was requested from a status that does not permit it
    #[error("cannot {operation} while {status}")]
    InvalidState {
        operation: &'static str,
        status: TimerStatus,
    },

    #[error("invalid duration: {0} (expected at least 1 second)")]
    InvalidDuration(String),

    /// The tick handle was suspended, resumed or cancelled out of order
    #[error("tick handle misuse: {0}")]
    HandleState(&'static str),

    #[error("timer task is no longer running")]
    ControllerClosed,
}

impl TimerError {
    pub fn invalid_state(operation: &'static str, status: TimerStatus) -> Self {
        Self::InvalidState { operation, status }
    }
}
