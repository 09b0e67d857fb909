//! Callback-driven watchdog.

use std::time::Duration;

use crate::action::{ExpiryCallback, ExpiryFn};
use crate::config::WatchdogConfig;
use crate::engine::WatchdogEngine;
use crate::error::WatchdogError;
use crate::metrics::WatchdogMetrics;
use crate::state::EngineStatus;

/// Watchdog that calls a plain function with a bound context on expiry.
///
/// Without a callback, expiry is a no-op, which is useful for exercising the
/// lifecycle alone.
///
/// # Example
///
/// ```rust
/// use deadman_watchdog::{ExpiryFn, Watchdog};
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
///
/// fn on_hang(hangs: &AtomicU32) {
///     hangs.fetch_add(1, Ordering::SeqCst);
/// }
///
/// let callback: ExpiryFn<AtomicU32> = on_hang;
/// let watchdog = Watchdog::new("main-loop", Some(callback), AtomicU32::new(0));
/// watchdog.start(Duration::from_millis(500));
/// // Serviced in time: the deadline is canceled before it passes.
/// watchdog.stop();
/// assert_eq!(watchdog.context().load(Ordering::SeqCst), 0);
/// ```
#[derive(Debug)]
pub struct Watchdog<C: Send + Sync + 'static = ()> {
    engine: WatchdogEngine<ExpiryCallback<C>>,
}

impl<C: Send + Sync + 'static> Watchdog<C> {
    /// Create a watchdog with the default configuration.
    pub fn new(descriptor: impl Into<String>, callback: Option<ExpiryFn<C>>, context: C) -> Self {
        Self::with_config(descriptor, WatchdogConfig::default(), callback, context)
    }

    /// Create a watchdog with an explicit configuration.
    pub fn with_config(
        descriptor: impl Into<String>,
        config: WatchdogConfig,
        callback: Option<ExpiryFn<C>>,
        context: C,
    ) -> Self {
        Self {
            engine: WatchdogEngine::new(descriptor, config, ExpiryCallback::new(callback, context)),
        }
    }

    /// The context passed to the callback.
    #[must_use]
    pub fn context(&self) -> &C {
        self.engine.action().context()
    }

    /// Arm (or rearm) the watchdog. See [`WatchdogEngine::start`].
    pub fn start(&self, delay: impl Into<Option<Duration>>) {
        self.engine.start(delay);
    }

    /// Cancel the pending deadline.
    pub fn stop(&self) {
        self.engine.stop();
    }

    /// Store the delay used by `start()` calls that do not pass one.
    pub fn set_delay(&self, delay: Duration) {
        self.engine.set_delay(delay);
    }

    /// The currently stored delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.engine.delay()
    }

    /// Whether the background thread reached its ready state.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.engine.is_valid()
    }

    /// Whether a deadline is currently pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.engine.is_armed()
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> EngineStatus {
        self.engine.status()
    }

    /// Snapshot of the watchdog counters.
    #[must_use]
    pub fn metrics(&self) -> WatchdogMetrics {
        self.engine.metrics()
    }

    /// Diagnostic descriptor given at construction.
    #[must_use]
    pub fn descriptor(&self) -> &str {
        self.engine.descriptor()
    }

    /// The error recorded while constructing, if any.
    #[must_use]
    pub fn construction_error(&self) -> Option<&WatchdogError> {
        self.engine.construction_error()
    }

    /// Stop the background thread and release the timer. Idempotent.
    pub fn shutdown(&mut self) {
        self.engine.shutdown();
    }
}
