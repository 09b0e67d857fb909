//! Error types for the watchdog.
//!
//! Construction failures are not returned from the constructor. They are
//! recorded on the engine, logged, and surfaced through `is_valid()` and
//! `construction_error()`, so a failed watchdog never takes down the
//! application it monitors.

use std::time::Duration;

use deadman_timer::TimerError;
use thiserror::Error;

/// Errors that can occur while constructing or running a watchdog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WatchdogError {
    /// The timer or the background thread could not be created.
    #[error("Watchdog resources exhausted: {0}")]
    ResourceExhausted(String),

    /// The background thread did not report readiness in time.
    #[error("Watchdog thread failed to start within {0:?}")]
    ThreadStartTimeout(Duration),

    /// The timer woke the background thread for a reason it cannot classify.
    #[error("Unexpected timer wake reason: {0}")]
    UnexpectedWakeReason(u32),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Timer operation failed.
    #[error("Timer error: {0}")]
    Timer(TimerError),
}

impl WatchdogError {
    /// Create a resource exhausted error.
    #[must_use]
    pub fn resource_exhausted(reason: impl Into<String>) -> Self {
        Self::ResourceExhausted(reason.into())
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }
}

impl From<TimerError> for WatchdogError {
    fn from(err: TimerError) -> Self {
        match err {
            TimerError::ResourceExhausted(reason) => Self::ResourceExhausted(reason),
            other => Self::Timer(other),
        }
    }
}

/// A specialized `Result` type for watchdog operations.
pub type WatchdogResult<T> = std::result::Result<T, WatchdogError>;
