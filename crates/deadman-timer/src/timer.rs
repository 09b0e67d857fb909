//! Waitable timer capability.
//!
//! The watchdog engine only ever talks to a timer through [`WaitableTimer`],
//! so platform specifics stay behind this trait.

use core::fmt;
use std::time::{Duration, Instant};

use crate::error::{TimerError, TimerResult};

/// Shortest delay a timer is armed with: one 100ns waitable-timer tick.
///
/// A zero delay is raised to this value so every arm produces a strictly
/// future deadline.
pub const MIN_DELAY: Duration = Duration::from_nanos(100);

/// Longest delay a timer is armed with: `u32::MAX` milliseconds (~49.7 days).
pub const MAX_DELAY: Duration = Duration::from_millis(u32::MAX as u64);

/// Why a blocked [`WaitableTimer::wait_for_expiry`] call returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WakeReason {
    /// The armed deadline elapsed.
    Expired,
    /// `cancel()` was called while waiting, or before the wait began.
    Canceled,
    /// The platform reported a wake the timer cannot classify.
    Unexpected(u32),
}

impl WakeReason {
    /// Check if this wake is a genuine expiry.
    #[must_use]
    pub fn is_expired(self) -> bool {
        matches!(self, Self::Expired)
    }

    /// Get the wake reason as a string slice.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expired => "Expired",
            Self::Canceled => "Canceled",
            Self::Unexpected(_) => "Unexpected",
        }
    }
}

impl fmt::Display for WakeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unexpected(code) => write!(f, "Unexpected({code})"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// A single-shot timer that one thread blocks on while others arm and cancel it.
///
/// # Contract
///
/// - `arm()` schedules exactly one future signal. Re-arming while armed
///   replaces the pending deadline.
/// - `cancel()` clears any pending deadline and wakes the current waiter
///   with [`WakeReason::Canceled`]. With no waiter blocked, the next wait
///   returns `Canceled` immediately. Safe to call when not armed.
/// - `wait_for_expiry()` blocks until the deadline elapses or a cancel is
///   observed. An elapsed deadline stays signaled until consumed.
pub trait WaitableTimer: Send + Sync + fmt::Debug {
    /// Arm the timer to signal once after `delay`.
    ///
    /// # Errors
    ///
    /// Returns an error if the deadline cannot be scheduled.
    fn arm(&self, delay: Duration) -> TimerResult<()>;

    /// Clear any pending deadline and wake the waiter.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the cancel.
    fn cancel(&self) -> TimerResult<()>;

    /// Block until the timer expires or is canceled.
    fn wait_for_expiry(&self) -> WakeReason;

    /// Check if a deadline is currently pending or signaled.
    fn is_armed(&self) -> bool;
}

/// Clamp a requested delay into `[MIN_DELAY, MAX_DELAY]`.
#[must_use]
pub fn effective_delay(delay: Duration) -> Duration {
    delay.clamp(MIN_DELAY, MAX_DELAY)
}

/// Convert a relative delay into an absolute deadline after `now`.
///
/// # Errors
///
/// Returns [`TimerError::DeadlineOverflow`] if the deadline is not representable.
pub fn deadline_after(now: Instant, delay: Duration) -> TimerResult<Instant> {
    now.checked_add(effective_delay(delay))
        .ok_or(TimerError::DeadlineOverflow)
}
