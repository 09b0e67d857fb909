//! Error types for timer operations.

use thiserror::Error;

/// Errors that can occur while creating or driving a waitable timer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// The platform could not allocate the timer object.
    #[error("Timer resources exhausted: {0}")]
    ResourceExhausted(String),

    /// The timer was never created or has already been destroyed.
    #[error("Timer is not available")]
    Dead,

    /// The requested delay cannot be represented as a deadline.
    #[error("Timer deadline overflow")]
    DeadlineOverflow,
}

impl TimerError {
    /// Create a resource exhausted error.
    #[must_use]
    pub fn resource_exhausted(reason: impl Into<String>) -> Self {
        Self::ResourceExhausted(reason.into())
    }

    /// Check whether the error means the timer is unusable from now on.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ResourceExhausted(_) | Self::Dead)
    }
}

/// A specialized `Result` type for timer operations.
pub type TimerResult<T> = std::result::Result<T, TimerError>;
