//! Watchdog counters.
//!
//! Counters use `Ordering::Relaxed`; they are diagnostics and never drive
//! the engine's control flow.

use portable_atomic::{AtomicU64, Ordering};
use serde::{Deserialize, Serialize};

/// Snapshot returned by [`WatchdogCounters::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WatchdogMetrics {
    /// Number of `start()` calls that reached a live timer.
    pub starts: u64,
    /// Number of `stop()` calls that reached a live timer.
    pub stops: u64,
    /// Number of expiry dispatches.
    pub expiries: u64,
    /// Number of wakes caused by `stop()`/rearm cancels.
    pub canceled_wakes: u64,
    /// Number of unclassified timer wakes.
    pub unexpected_wakes: u64,
    /// Number of panics caught from the expiry action.
    pub callback_panics: u64,
    /// Number of times arming the timer failed.
    pub arm_failures: u64,
}

/// Atomic counters shared between the caller side and the background thread.
#[derive(Debug, Default)]
pub struct WatchdogCounters {
    starts: AtomicU64,
    stops: AtomicU64,
    expiries: AtomicU64,
    canceled_wakes: AtomicU64,
    unexpected_wakes: AtomicU64,
    callback_panics: AtomicU64,
    arm_failures: AtomicU64,
}

impl WatchdogCounters {
    /// Create zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a `start()`.
    pub fn inc_start(&self) {
        self.starts.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a `stop()`.
    pub fn inc_stop(&self) {
        self.stops.fetch_add(1, Ordering::Relaxed);
    }

    /// Count an expiry dispatch.
    pub fn inc_expiry(&self) {
        self.expiries.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a canceled wake.
    pub fn inc_canceled_wake(&self) {
        self.canceled_wakes.fetch_add(1, Ordering::Relaxed);
    }

    /// Count an unexpected wake.
    pub fn inc_unexpected_wake(&self) {
        self.unexpected_wakes.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a caught panic.
    pub fn inc_callback_panic(&self) {
        self.callback_panics.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a failed arm.
    pub fn inc_arm_failure(&self) {
        self.arm_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all counters.
    #[must_use]
    pub fn snapshot(&self) -> WatchdogMetrics {
        WatchdogMetrics {
            starts: self.starts.load(Ordering::Relaxed),
            stops: self.stops.load(Ordering::Relaxed),
            expiries: self.expiries.load(Ordering::Relaxed),
            canceled_wakes: self.canceled_wakes.load(Ordering::Relaxed),
            unexpected_wakes: self.unexpected_wakes.load(Ordering::Relaxed),
            callback_panics: self.callback_panics.load(Ordering::Relaxed),
            arm_failures: self.arm_failures.load(Ordering::Relaxed),
        }
    }
}
