//! Prelude for deadman-timer.
//!
//! This module re-exports the most commonly used types for convenient importing.

pub use crate::error::{TimerError, TimerResult};
pub use crate::handle::TimerHandle;
#[cfg(any(test, feature = "test-utils"))]
pub use crate::manual::ManualTimer;
pub use crate::monotonic::MonotonicTimer;
pub use crate::timer::{MAX_DELAY, MIN_DELAY, WaitableTimer, WakeReason};
