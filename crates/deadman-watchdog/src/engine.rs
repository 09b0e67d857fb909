//! Watchdog engine: background thread, arming, cancellation and expiry dispatch.
//!
//! One engine owns one timer and one background thread. The thread blocks on
//! the timer, and each time it wakes it checks the shutdown flag before doing
//! anything else:
//!
//! ```text
//! Starting ──► Ready ──► wait_for_expiry() ◄─────────────┐
//!                              │                          │
//!                   shutdown?──┴──► exit (Terminated)     │
//!                              │                          │
//!                Expired ──► run expiry action ───────────┤
//!                Canceled ──► (stop / rearm) ─────────────┤
//!                Unexpected ──► log, dispatch or rewait ──┘
//! ```
//!
//! Destruction sets the shutdown flag, cancels the timer to wake the thread,
//! joins it and only then releases the timer.

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use deadman_timer::{MonotonicTimer, TimerError, TimerHandle, TimerResult, WaitableTimer, WakeReason};
use portable_atomic::{AtomicBool, AtomicU64, Ordering};
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::action::ExpiryAction;
use crate::config::{UnexpectedWakePolicy, WatchdogConfig};
use crate::error::{WatchdogError, WatchdogResult};
use crate::metrics::{WatchdogCounters, WatchdogMetrics};
use crate::state::{EngineState, EngineStatus};

/// State shared between the engine and its background thread.
#[derive(Debug)]
struct Shared {
    descriptor: String,
    shutting_down: AtomicBool,
    valid: AtomicBool,
    state: EngineState,
    counters: WatchdogCounters,
    unexpected_wake: UnexpectedWakePolicy,
    catch_panics: bool,
}

impl Shared {
    fn new(descriptor: String, config: &WatchdogConfig) -> Self {
        Self {
            descriptor,
            shutting_down: AtomicBool::new(false),
            valid: AtomicBool::new(false),
            state: EngineState::new(),
            counters: WatchdogCounters::new(),
            unexpected_wake: config.unexpected_wake,
            catch_panics: config.catch_panics,
        }
    }

    fn dispatch<A: ExpiryAction>(&self, action: &A) {
        self.counters.inc_expiry();
        tracing::debug!("Watchdog expired, running expiry action");

        if !self.catch_panics {
            action.expiry();
            return;
        }
        if panic::catch_unwind(AssertUnwindSafe(|| action.expiry())).is_err() {
            self.counters.inc_callback_panic();
            tracing::error!("Expiry action panicked, watchdog keeps watching");
        }
    }

    fn handle_unexpected_wake<A: ExpiryAction>(&self, code: u32, action: &A) {
        self.counters.inc_unexpected_wake();
        let error = WatchdogError::UnexpectedWakeReason(code);
        match self.unexpected_wake {
            UnexpectedWakePolicy::Dispatch => {
                tracing::warn!(error = %error, "Treating unexpected timer wake as expiry");
                self.dispatch(action);
            }
            UnexpectedWakePolicy::Rewait => {
                tracing::warn!(error = %error, "Ignoring unexpected timer wake");
            }
        }
    }
}

/// Background thread body.
fn run_worker<A: ExpiryAction, T: WaitableTimer>(
    shared: &Shared,
    timer: &T,
    action: &A,
    ready: Sender<()>,
) {
    let span = tracing::debug_span!("watchdog", descriptor = %shared.descriptor);
    let _entered = span.enter();

    shared.valid.store(true, Ordering::Release);
    if shared
        .state
        .advance(EngineStatus::Starting, EngineStatus::Ready)
    {
        tracing::debug!("Watchdog thread ready");
    }
    if ready.send(()).is_err() {
        tracing::warn!("Watchdog thread became ready after the startup timeout");
    }
    drop(ready);

    loop {
        let reason = timer.wait_for_expiry();
        if shared.shutting_down.load(Ordering::Acquire) {
            break;
        }

        match reason {
            WakeReason::Expired => shared.dispatch(action),
            WakeReason::Canceled => {
                shared.counters.inc_canceled_wake();
                tracing::trace!("Timer canceled, waiting again");
            }
            WakeReason::Unexpected(code) => shared.handle_unexpected_wake(code, action),
        }
    }

    shared
        .state
        .advance(EngineStatus::ShuttingDown, EngineStatus::Terminated);
    tracing::debug!("Watchdog thread exiting");
}

/// Background thread entry point handed to the spawner.
type WorkerBody = Box<dyn FnOnce() + Send + 'static>;

fn spawn_worker(builder: thread::Builder, body: WorkerBody) -> io::Result<JoinHandle<()>> {
    builder.spawn(body)
}

/// Wait for the background thread's readiness signal.
fn await_ready(ready: &Receiver<()>, timeout: Duration) -> WatchdogResult<()> {
    match ready.recv_timeout(timeout) {
        Ok(()) => Ok(()),
        Err(RecvTimeoutError::Timeout) => Err(WatchdogError::ThreadStartTimeout(timeout)),
        Err(RecvTimeoutError::Disconnected) => Err(WatchdogError::resource_exhausted(
            "watchdog thread exited before signaling readiness",
        )),
    }
}

fn duration_to_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

fn thread_name(descriptor: &str) -> String {
    let mut name = String::from("watchdog-");
    name.extend(descriptor.chars().filter(|c| *c != '\0'));
    name
}

/// Deadman-switch engine running an [`ExpiryAction`] when not serviced in time.
///
/// Construction spawns the background thread and waits, bounded by
/// `startup_timeout`, for it to report readiness. Construction never fails
/// outright: check [`is_valid`](Self::is_valid) (or use
/// [`try_new`](Self::try_new)) before relying on the watchdog.
///
/// # Thread Safety
///
/// `start()`, `stop()` and `set_delay()` take `&self` and may be called from
/// any thread, concurrently with the background thread. The expiry action
/// only ever runs on the background thread.
///
/// # Example
///
/// ```rust
/// use deadman_watchdog::prelude::*;
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
///
/// let fired = Arc::new(AtomicU32::new(0));
/// let counter = Arc::clone(&fired);
/// let engine = WatchdogEngine::new("render-loop", WatchdogConfig::default(), move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
/// assert!(engine.is_valid());
///
/// engine.start(Duration::from_millis(10));
/// std::thread::sleep(Duration::from_millis(200));
/// assert_eq!(fired.load(Ordering::SeqCst), 1);
/// ```
pub struct WatchdogEngine<A: ExpiryAction, T: WaitableTimer + 'static = MonotonicTimer> {
    shared: Arc<Shared>,
    timer: TimerHandle<T>,
    action: Arc<A>,
    delay_nanos: AtomicU64,
    worker: Option<JoinHandle<()>>,
    construction_error: Option<WatchdogError>,
}

impl<A: ExpiryAction> WatchdogEngine<A> {
    /// Create a watchdog on the portable monotonic timer.
    pub fn new(descriptor: impl Into<String>, config: WatchdogConfig, action: A) -> Self {
        Self::with_timer(descriptor, config, action, MonotonicTimer::create())
    }

    /// Create a watchdog and fail if it is not fully operational.
    ///
    /// # Errors
    ///
    /// Returns the construction error (invalid configuration, exhausted
    /// resources or a startup timeout). The partially built watchdog is
    /// shut down before returning.
    pub fn try_new(
        descriptor: impl Into<String>,
        config: WatchdogConfig,
        action: A,
    ) -> WatchdogResult<Self> {
        let engine = Self::new(descriptor, config, action);
        if let Some(error) = engine.construction_error.clone() {
            return Err(error);
        }
        Ok(engine)
    }
}

impl<A: ExpiryAction, T: WaitableTimer + 'static> WatchdogEngine<A, T> {
    /// Create a watchdog on an explicitly created timer.
    ///
    /// Passing the timer's creation result lets a failed creation leave the
    /// watchdog in the `Failed` state instead of aborting construction.
    pub fn with_timer(
        descriptor: impl Into<String>,
        config: WatchdogConfig,
        action: A,
        timer: TimerResult<T>,
    ) -> Self {
        Self::assemble(descriptor, config, action, timer, spawn_worker)
    }

    fn assemble<S>(
        descriptor: impl Into<String>,
        config: WatchdogConfig,
        action: A,
        timer: TimerResult<T>,
        spawn: S,
    ) -> Self
    where
        S: FnOnce(thread::Builder, WorkerBody) -> io::Result<JoinHandle<()>>,
    {
        let shared = Arc::new(Shared::new(descriptor.into(), &config));
        let mut engine = Self {
            shared,
            timer: TimerHandle::dead(),
            action: Arc::new(action),
            delay_nanos: AtomicU64::new(duration_to_nanos(config.default_delay)),
            worker: None,
            construction_error: None,
        };

        if let Err(error) = engine.launch(&config, timer, spawn) {
            tracing::error!(
                descriptor = %engine.shared.descriptor,
                error = %error,
                "Watchdog construction failed"
            );
            engine.construction_error = Some(error);
        }
        engine
    }

    fn launch<S>(
        &mut self,
        config: &WatchdogConfig,
        timer: TimerResult<T>,
        spawn: S,
    ) -> WatchdogResult<()>
    where
        S: FnOnce(thread::Builder, WorkerBody) -> io::Result<JoinHandle<()>>,
    {
        if let Err(error) = config.validate() {
            self.shared.state.fail();
            return Err(error);
        }

        self.timer = match TimerHandle::create(|| timer) {
            Ok(handle) => handle,
            Err(error) => {
                self.shared.state.fail();
                return Err(error.into());
            }
        };
        let Some(waitable) = self.timer.share() else {
            self.shared.state.fail();
            return Err(WatchdogError::Timer(TimerError::Dead));
        };

        let (ready_tx, ready_rx) = channel::bounded(1);
        let shared = Arc::clone(&self.shared);
        let action = Arc::clone(&self.action);
        let body: WorkerBody = Box::new(move || {
            run_worker(&shared, waitable.as_ref(), action.as_ref(), ready_tx);
        });
        let builder = thread::Builder::new().name(thread_name(&self.shared.descriptor));

        match spawn(builder, body) {
            Ok(worker) => self.worker = Some(worker),
            Err(error) => {
                self.shared.state.fail();
                self.timer.destroy();
                return Err(WatchdogError::resource_exhausted(format!(
                    "failed to spawn watchdog thread: {error}"
                )));
            }
        }

        await_ready(&ready_rx, config.startup_timeout)?;
        tracing::debug!(descriptor = %self.shared.descriptor, "Watchdog ready");
        Ok(())
    }

    /// Store the delay used by `start()` calls that do not pass one.
    pub fn set_delay(&self, delay: Duration) {
        self.delay_nanos
            .store(duration_to_nanos(delay), Ordering::Relaxed);
    }

    /// The currently stored delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_nanos(self.delay_nanos.load(Ordering::Relaxed))
    }

    /// Arm (or rearm) the watchdog.
    ///
    /// With `Some(delay)`, the delay is stored first. Any pending arm is
    /// canceled before the timer is armed again, so calling `start()`
    /// repeatedly without `stop()` keeps only the last deadline.
    pub fn start(&self, delay: impl Into<Option<Duration>>) {
        if let Some(delay) = delay.into() {
            self.set_delay(delay);
        }
        let delay = self.delay();

        if self.timer.is_dead() {
            tracing::warn!(
                descriptor = %self.shared.descriptor,
                "Watchdog start ignored, timer is not available"
            );
            return;
        }

        if let Err(error) = self.timer.cancel() {
            tracing::warn!(
                descriptor = %self.shared.descriptor,
                error = %error,
                "Failed to cancel pending watchdog deadline"
            );
        }
        match self.timer.arm(delay) {
            Ok(()) => {
                self.shared.counters.inc_start();
                tracing::trace!(
                    descriptor = %self.shared.descriptor,
                    delay_ms = delay.as_millis(),
                    "Watchdog armed"
                );
            }
            Err(error) => {
                self.shared.counters.inc_arm_failure();
                tracing::warn!(
                    descriptor = %self.shared.descriptor,
                    error = %error,
                    "Failed to arm watchdog timer"
                );
            }
        }
    }

    /// Cancel the pending deadline. Safe when never started.
    pub fn stop(&self) {
        match self.timer.cancel() {
            Ok(()) => {
                self.shared.counters.inc_stop();
                tracing::trace!(descriptor = %self.shared.descriptor, "Watchdog stopped");
            }
            Err(TimerError::Dead) => {
                tracing::debug!(
                    descriptor = %self.shared.descriptor,
                    "Watchdog stop ignored, timer is not available"
                );
            }
            Err(error) => {
                tracing::warn!(
                    descriptor = %self.shared.descriptor,
                    error = %error,
                    "Failed to cancel watchdog timer"
                );
            }
        }
    }

    /// Whether the background thread reached its ready state.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.shared.valid.load(Ordering::Acquire)
    }

    /// Whether a deadline is currently pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.timer.is_armed()
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> EngineStatus {
        self.shared.state.status()
    }

    /// Snapshot of the watchdog counters.
    #[must_use]
    pub fn metrics(&self) -> WatchdogMetrics {
        self.shared.counters.snapshot()
    }

    /// Diagnostic descriptor given at construction.
    #[must_use]
    pub fn descriptor(&self) -> &str {
        &self.shared.descriptor
    }

    /// The error recorded while constructing, if any.
    #[must_use]
    pub fn construction_error(&self) -> Option<&WatchdogError> {
        self.construction_error.as_ref()
    }

    /// The bound expiry action.
    #[must_use]
    pub fn action(&self) -> &A {
        &self.action
    }

    /// Shared access to the underlying timer, `None` once destroyed.
    #[must_use]
    pub fn timer(&self) -> Option<Arc<T>> {
        self.timer.share()
    }

    /// Stop the background thread and release the timer.
    ///
    /// Sets the shutdown flag, cancels the timer to wake the thread, joins it
    /// and destroys the timer. Idempotent, and safe after a failed
    /// construction. Called automatically on drop.
    ///
    /// The join waits for an expiry action that is already running. When
    /// called from the expiry action itself the thread is detached instead.
    pub fn shutdown(&mut self) {
        let previous = self.shared.state.begin_shutdown();

        // The flag must be visible before the cancel wakes the thread.
        self.shared.shutting_down.store(true, Ordering::SeqCst);
        match self.timer.cancel() {
            Ok(()) | Err(TimerError::Dead) => {}
            Err(error) => {
                tracing::warn!(
                    descriptor = %self.shared.descriptor,
                    error = %error,
                    "Failed to cancel watchdog timer during shutdown"
                );
            }
        }

        if let Some(worker) = self.worker.take() {
            if worker.thread().id() == thread::current().id() {
                tracing::warn!(
                    descriptor = %self.shared.descriptor,
                    "Watchdog dropped from its own expiry action, detaching thread"
                );
            } else {
                if worker.join().is_err() {
                    tracing::error!(
                        descriptor = %self.shared.descriptor,
                        "Watchdog thread panicked"
                    );
                }
                self.shared
                    .state
                    .advance(EngineStatus::ShuttingDown, EngineStatus::Terminated);
            }
        }

        self.timer.destroy();
        if !previous.is_terminal() && previous != EngineStatus::ShuttingDown {
            tracing::debug!(descriptor = %self.shared.descriptor, "Watchdog shut down");
        }
    }
}

impl<A: ExpiryAction, T: WaitableTimer + 'static> Drop for WatchdogEngine<A, T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<A: ExpiryAction, T: WaitableTimer + 'static> std::fmt::Debug for WatchdogEngine<A, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchdogEngine")
            .field("descriptor", &self.shared.descriptor)
            .field("status", &self.status())
            .field("valid", &self.is_valid())
            .field("delay", &self.delay())
            .field("timer_dead", &self.timer.is_dead())
            .field("construction_error", &self.construction_error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deadman_timer::ManualTimer;
    use std::sync::atomic::{AtomicU32, Ordering as StdOrdering};
    use std::time::Instant;

    type Counter = Arc<AtomicU32>;

    fn counting_action() -> (Counter, impl Fn() + Send + Sync + 'static) {
        let hits = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&hits);
        (hits, move || {
            counter.fetch_add(1, StdOrdering::SeqCst);
        })
    }

    fn wait_for(condition: impl Fn() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(1));
        }
        condition()
    }

    fn manual_engine<A: ExpiryAction>(
        config: WatchdogConfig,
        action: A,
    ) -> (WatchdogEngine<A, ManualTimer>, Arc<ManualTimer>) {
        let engine = WatchdogEngine::with_timer("manual", config, action, Ok(ManualTimer::new()));
        let timer = engine.timer().unwrap_or_default();
        (engine, timer)
    }

    #[test]
    fn test_construction_reports_ready() {
        let (_, action) = counting_action();
        let engine = WatchdogEngine::new("ready", WatchdogConfig::default(), action);
        assert!(engine.is_valid());
        assert_eq!(engine.status(), EngineStatus::Ready);
        assert!(engine.construction_error().is_none());
        assert_eq!(engine.delay(), Duration::from_secs(300));
        assert!(!engine.is_armed());
    }

    #[test]
    fn test_start_uses_stored_delay() {
        let (_, action) = counting_action();
        let (engine, timer) = manual_engine(WatchdogConfig::default(), action);

        engine.set_delay(Duration::from_millis(750));
        engine.start(None);
        assert_eq!(timer.last_delay(), Some(Duration::from_millis(750)));

        engine.start(Duration::from_millis(2000));
        assert_eq!(timer.last_delay(), Some(Duration::from_millis(2000)));
        assert_eq!(engine.delay(), Duration::from_millis(2000));
        assert_eq!(engine.metrics().starts, 2);
    }

    #[test]
    fn test_start_cancels_before_arming() {
        let (_, action) = counting_action();
        let (engine, timer) = manual_engine(WatchdogConfig::default(), action);

        engine.start(Duration::from_secs(1));
        engine.start(Duration::from_secs(1));
        assert_eq!(timer.cancel_count(), 2);
        assert_eq!(timer.arm_count(), 2);
    }

    #[test]
    fn test_manual_expiry_dispatches_once() {
        let (hits, action) = counting_action();
        let (engine, timer) = manual_engine(WatchdogConfig::default(), action);

        engine.start(Duration::from_secs(2));
        assert!(timer.fire());
        assert!(wait_for(|| hits.load(StdOrdering::SeqCst) == 1));

        // Single shot: firing again without a new start does nothing.
        assert!(!timer.fire());
        thread::sleep(Duration::from_millis(20));
        assert_eq!(hits.load(StdOrdering::SeqCst), 1);
        assert_eq!(engine.metrics().expiries, 1);
    }

    #[test]
    fn test_unexpected_wake_dispatch_policy() {
        let (hits, action) = counting_action();
        let (engine, timer) = manual_engine(WatchdogConfig::default(), action);

        assert!(timer.wait_for_waiter(Duration::from_secs(5)));
        timer.inject_unexpected(0x80);
        assert!(wait_for(|| hits.load(StdOrdering::SeqCst) == 1));
        assert_eq!(engine.metrics().unexpected_wakes, 1);
    }

    #[test]
    fn test_unexpected_wake_rewait_policy() -> WatchdogResult<()> {
        let config = WatchdogConfig::builder()
            .unexpected_wake(UnexpectedWakePolicy::Rewait)
            .build()?;
        let (hits, action) = counting_action();
        let (engine, timer) = manual_engine(config, action);

        assert!(timer.wait_for_waiter(Duration::from_secs(5)));
        timer.inject_unexpected(0x80);
        assert!(wait_for(|| engine.metrics().unexpected_wakes == 1));
        assert!(timer.wait_for_waiter(Duration::from_secs(5)));
        assert_eq!(hits.load(StdOrdering::SeqCst), 0);
        Ok(())
    }

    #[test]
    fn test_failed_timer_creation_leaves_dead_engine() {
        let (hits, action) = counting_action();
        let mut engine = WatchdogEngine::<_, ManualTimer>::with_timer(
            "no-timer",
            WatchdogConfig::default(),
            action,
            Err(TimerError::resource_exhausted("quota reached")),
        );

        assert!(!engine.is_valid());
        assert_eq!(engine.status(), EngineStatus::Failed);
        assert_eq!(
            engine.construction_error(),
            Some(&WatchdogError::resource_exhausted("quota reached"))
        );

        engine.start(Duration::from_millis(1));
        engine.stop();
        assert_eq!(engine.metrics().starts, 0);
        assert!(engine.timer().is_none());

        engine.shutdown();
        engine.shutdown();
        assert_eq!(engine.status(), EngineStatus::Failed);
        assert_eq!(hits.load(StdOrdering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_config_fails_construction() {
        let (_, action) = counting_action();
        let config = WatchdogConfig {
            startup_timeout: Duration::ZERO,
            ..WatchdogConfig::default()
        };
        let result = WatchdogEngine::try_new("bad-config", config, action);
        assert!(matches!(result, Err(WatchdogError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_shutdown_terminates_thread() {
        let (hits, action) = counting_action();
        let (mut engine, timer) = manual_engine(WatchdogConfig::default(), action);

        engine.start(Duration::from_secs(60));
        engine.shutdown();

        assert_eq!(engine.status(), EngineStatus::Terminated);
        assert!(engine.timer().is_none());
        assert_eq!(timer.waiters(), 0);
        assert!(!timer.fire());
        assert_eq!(hits.load(StdOrdering::SeqCst), 0);
    }

    #[test]
    fn test_await_ready_times_out_without_signal() {
        let (ready_tx, ready_rx) = channel::bounded::<()>(1);
        let timeout = Duration::from_millis(10);

        assert_eq!(
            await_ready(&ready_rx, timeout),
            Err(WatchdogError::ThreadStartTimeout(timeout))
        );
        // The sender is still alive, so this was a timeout and not a disconnect.
        drop(ready_tx);
    }

    #[test]
    fn test_await_ready_reports_exited_thread() {
        let (ready_tx, ready_rx) = channel::bounded::<()>(1);
        drop(ready_tx);

        let result = await_ready(&ready_rx, Duration::from_secs(5));
        assert!(matches!(result, Err(WatchdogError::ResourceExhausted(_))));
    }

    #[test]
    fn test_await_ready_accepts_signal() -> WatchdogResult<()> {
        let (ready_tx, ready_rx) = channel::bounded::<()>(1);
        assert!(ready_tx.send(()).is_ok());
        await_ready(&ready_rx, Duration::from_millis(10))
    }

    #[test]
    fn test_spawn_failure_leaves_failed_engine() {
        let (hits, action) = counting_action();
        let mut engine = WatchdogEngine::assemble(
            "no-thread",
            WatchdogConfig::default(),
            action,
            Ok(ManualTimer::new()),
            |_builder, _body| Err(io::Error::other("thread quota reached")),
        );

        assert!(!engine.is_valid());
        assert_eq!(engine.status(), EngineStatus::Failed);
        assert!(matches!(
            engine.construction_error(),
            Some(WatchdogError::ResourceExhausted(message))
                if message.contains("failed to spawn watchdog thread")
        ));
        assert!(engine.timer().is_none());

        engine.start(Duration::from_millis(1));
        assert_eq!(engine.metrics().starts, 0);
        engine.shutdown();
        assert_eq!(engine.status(), EngineStatus::Failed);
        assert_eq!(hits.load(StdOrdering::SeqCst), 0);
    }

    #[test]
    fn test_late_ready_thread_becomes_valid() -> WatchdogResult<()> {
        let config = WatchdogConfig::builder()
            .startup_timeout(Duration::from_millis(20))
            .build()?;
        let (hits, action) = counting_action();
        let (gate_tx, gate_rx) = channel::bounded::<()>(1);
        let engine = WatchdogEngine::assemble(
            "late",
            config,
            action,
            Ok(ManualTimer::new()),
            move |builder, body| {
                builder.spawn(move || {
                    if gate_rx.recv().is_ok() {
                        body();
                    }
                })
            },
        );

        assert_eq!(
            engine.construction_error(),
            Some(&WatchdogError::ThreadStartTimeout(Duration::from_millis(20)))
        );
        assert!(!engine.is_valid());
        assert_eq!(engine.status(), EngineStatus::Starting);

        assert!(gate_tx.send(()).is_ok());
        assert!(wait_for(|| engine.is_valid()));
        assert_eq!(engine.status(), EngineStatus::Ready);

        let timer = engine.timer().unwrap_or_default();
        engine.start(Duration::from_secs(2));
        assert!(timer.fire());
        assert!(wait_for(|| hits.load(StdOrdering::SeqCst) == 1));

        drop(engine);
        assert_eq!(timer.waiters(), 0);
        Ok(())
    }

    #[test]
    fn test_thread_name_strips_nul() {
        assert_eq!(thread_name("a\0b"), "watchdog-ab");
        assert_eq!(duration_to_nanos(Duration::MAX), u64::MAX);
    }
}
