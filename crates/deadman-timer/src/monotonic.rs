//! Portable waitable timer on the monotonic clock.

use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::error::TimerResult;
use crate::timer::{WaitableTimer, WakeReason, deadline_after};

#[derive(Debug, Default)]
struct TimerState {
    deadline: Option<Instant>,
    cancel_pending: bool,
}

/// Single-shot timer backed by `Instant` deadlines and a condition variable.
///
/// Behaves like a synchronization timer: a deadline elapsing with no waiter
/// stays signaled until the next `wait_for_expiry()` consumes it.
///
/// # Example
///
/// ```rust
/// use deadman_timer::{MonotonicTimer, WaitableTimer, WakeReason};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let timer = Arc::new(MonotonicTimer::create().expect("timer"));
/// timer.arm(Duration::from_secs(60)).expect("arm");
///
/// let waiter = Arc::clone(&timer);
/// let handle = std::thread::spawn(move || waiter.wait_for_expiry());
///
/// timer.cancel().expect("cancel");
/// assert_eq!(handle.join().ok(), Some(WakeReason::Canceled));
/// ```
#[derive(Debug)]
pub struct MonotonicTimer {
    state: Mutex<TimerState>,
    signal: Condvar,
}

impl MonotonicTimer {
    /// Create a new disarmed timer.
    ///
    /// # Errors
    ///
    /// Never fails on this implementation; the signature matches platform
    /// timers whose allocation can fail.
    pub fn create() -> TimerResult<Self> {
        Ok(Self {
            state: Mutex::new(TimerState::default()),
            signal: Condvar::new(),
        })
    }

    /// Time left until the pending deadline, if armed.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        let state = self.state.lock();
        state
            .deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

impl WaitableTimer for MonotonicTimer {
    fn arm(&self, delay: Duration) -> TimerResult<()> {
        let deadline = deadline_after(Instant::now(), delay)?;
        let mut state = self.state.lock();
        state.deadline = Some(deadline);
        drop(state);
        self.signal.notify_all();
        Ok(())
    }

    fn cancel(&self) -> TimerResult<()> {
        let mut state = self.state.lock();
        state.deadline = None;
        state.cancel_pending = true;
        drop(state);
        self.signal.notify_all();
        Ok(())
    }

    fn wait_for_expiry(&self) -> WakeReason {
        let mut state = self.state.lock();
        loop {
            if state.cancel_pending {
                state.cancel_pending = false;
                return WakeReason::Canceled;
            }
            match state.deadline {
                Some(deadline) if Instant::now() >= deadline => {
                    state.deadline = None;
                    return WakeReason::Expired;
                }
                Some(deadline) => {
                    let _ = self.signal.wait_until(&mut state, deadline);
                }
                None => self.signal.wait(&mut state),
            }
        }
    }

    fn is_armed(&self) -> bool {
        self.state.lock().deadline.is_some()
    }
}
