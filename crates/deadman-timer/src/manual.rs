//! Scripted timer for deterministic tests.
//!
//! [`ManualTimer`] never fires on its own. Tests arm it through the code under
//! test and then decide when it expires with [`ManualTimer::fire`], or inject
//! a wake the platform could not classify with
//! [`ManualTimer::inject_unexpected`].

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::error::TimerResult;
use crate::timer::{WaitableTimer, WakeReason};

#[derive(Debug, Default)]
struct ManualState {
    armed: bool,
    cancel_pending: bool,
    queued: VecDeque<WakeReason>,
    last_delay: Option<Duration>,
    arm_count: u64,
    cancel_count: u64,
    waiters: usize,
}

/// Waitable timer driven explicitly by the test.
///
/// # Example
///
/// ```rust
/// use deadman_timer::{ManualTimer, WaitableTimer, WakeReason};
/// use std::time::Duration;
///
/// let timer = ManualTimer::new();
/// timer.arm(Duration::from_secs(2)).expect("arm");
/// assert!(timer.fire());
/// assert_eq!(timer.wait_for_expiry(), WakeReason::Expired);
///
/// // Single shot: nothing is armed any more.
/// assert!(!timer.fire());
/// ```
#[derive(Debug, Default)]
pub struct ManualTimer {
    state: Mutex<ManualState>,
    signal: Condvar,
}

impl ManualTimer {
    /// Create a disarmed manual timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire the pending deadline now.
    ///
    /// Returns `false` without signaling if the timer is not armed.
    pub fn fire(&self) -> bool {
        let mut state = self.state.lock();
        if !state.armed {
            return false;
        }
        state.armed = false;
        state.queued.push_back(WakeReason::Expired);
        drop(state);
        self.signal.notify_all();
        true
    }

    /// Deliver a wake the platform could not classify.
    pub fn inject_unexpected(&self, code: u32) {
        let mut state = self.state.lock();
        state.queued.push_back(WakeReason::Unexpected(code));
        drop(state);
        self.signal.notify_all();
    }

    /// Block until at least one thread is inside `wait_for_expiry()`.
    ///
    /// Returns `false` if `timeout` elapses first.
    pub fn wait_for_waiter(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        while state.waiters == 0 {
            if self.signal.wait_until(&mut state, deadline).timed_out() {
                return state.waiters > 0;
            }
        }
        true
    }

    /// Number of threads currently blocked in `wait_for_expiry()`.
    #[must_use]
    pub fn waiters(&self) -> usize {
        self.state.lock().waiters
    }

    /// Number of `arm()` calls so far.
    #[must_use]
    pub fn arm_count(&self) -> u64 {
        self.state.lock().arm_count
    }

    /// Number of `cancel()` calls so far.
    #[must_use]
    pub fn cancel_count(&self) -> u64 {
        self.state.lock().cancel_count
    }

    /// Delay passed to the most recent `arm()`.
    #[must_use]
    pub fn last_delay(&self) -> Option<Duration> {
        self.state.lock().last_delay
    }
}

impl WaitableTimer for ManualTimer {
    fn arm(&self, delay: Duration) -> TimerResult<()> {
        let mut state = self.state.lock();
        state.armed = true;
        state.last_delay = Some(delay);
        state.arm_count = state.arm_count.saturating_add(1);
        Ok(())
    }

    fn cancel(&self) -> TimerResult<()> {
        let mut state = self.state.lock();
        state.armed = false;
        state.cancel_pending = true;
        state.queued.retain(|reason| !reason.is_expired());
        state.cancel_count = state.cancel_count.saturating_add(1);
        drop(state);
        self.signal.notify_all();
        Ok(())
    }

    fn wait_for_expiry(&self) -> WakeReason {
        let mut state = self.state.lock();
        state.waiters = state.waiters.saturating_add(1);
        self.signal.notify_all();
        let reason = loop {
            if state.cancel_pending {
                state.cancel_pending = false;
                break WakeReason::Canceled;
            }
            if let Some(reason) = state.queued.pop_front() {
                break reason;
            }
            self.signal.wait(&mut state);
        };
        state.waiters = state.waiters.saturating_sub(1);
        reason
    }

    fn is_armed(&self) -> bool {
        let state = self.state.lock();
        state.armed || state.queued.iter().any(|reason| reason.is_expired())
    }
}
