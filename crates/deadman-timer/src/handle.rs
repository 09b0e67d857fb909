//! Owning timer handle with a "dead" state.
//!
//! A [`TimerHandle`] either owns a live timer or is dead because creation
//! failed or the timer was destroyed. Every operation on a dead handle
//! reports [`TimerError::Dead`] instead of panicking, so a watchdog whose
//! timer could not be created stays safe to use and to drop.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{TimerError, TimerResult};
use crate::timer::{WaitableTimer, WakeReason};

/// Owning handle to a shared waitable timer.
#[derive(Debug)]
pub struct TimerHandle<T: WaitableTimer> {
    inner: Option<Arc<T>>,
}

impl<T: WaitableTimer> TimerHandle<T> {
    /// Create a live handle from a timer factory.
    ///
    /// # Errors
    ///
    /// Returns the factory's error; use [`TimerHandle::dead`] to keep going
    /// with a dead primitive.
    pub fn create<F>(factory: F) -> TimerResult<Self>
    where
        F: FnOnce() -> TimerResult<T>,
    {
        factory().map(Self::from_timer)
    }

    /// Wrap an already created timer.
    #[must_use]
    pub fn from_timer(timer: T) -> Self {
        Self {
            inner: Some(Arc::new(timer)),
        }
    }

    /// Create a handle with no timer behind it.
    #[must_use]
    pub fn dead() -> Self {
        Self { inner: None }
    }

    /// Check whether the handle has no live timer.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.inner.is_none()
    }

    /// Share the underlying timer with a waiting thread.
    ///
    /// The timer is released once the handle and every shared clone are gone.
    #[must_use]
    pub fn share(&self) -> Option<Arc<T>> {
        self.inner.clone()
    }

    /// Arm the timer.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Dead`] on a dead handle, or the timer's own error.
    pub fn arm(&self, delay: Duration) -> TimerResult<()> {
        self.live()?.arm(delay)
    }

    /// Cancel the timer.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Dead`] on a dead handle, or the timer's own error.
    pub fn cancel(&self) -> TimerResult<()> {
        self.live()?.cancel()
    }

    /// Block until the timer expires or is canceled.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Dead`] on a dead handle.
    pub fn wait_for_expiry(&self) -> TimerResult<WakeReason> {
        Ok(self.live()?.wait_for_expiry())
    }

    /// Check if the timer is armed. A dead handle is never armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.inner.as_ref().is_some_and(|timer| timer.is_armed())
    }

    /// Release the timer. Safe to call repeatedly and on a dead handle.
    pub fn destroy(&mut self) {
        if let Some(timer) = self.inner.take() {
            tracing::trace!(
                shared = Arc::strong_count(&timer).saturating_sub(1),
                "Releasing waitable timer"
            );
        }
    }

    fn live(&self) -> TimerResult<&T> {
        self.inner.as_deref().ok_or(TimerError::Dead)
    }
}

impl<T: WaitableTimer> Drop for TimerHandle<T> {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manual::ManualTimer;
    use crate::monotonic::MonotonicTimer;

    #[test]
    fn test_dead_handle_reports_failure() {
        let handle = TimerHandle::<MonotonicTimer>::dead();
        assert!(handle.is_dead());
        assert!(!handle.is_armed());
        assert_eq!(handle.arm(Duration::from_millis(1)), Err(TimerError::Dead));
        assert_eq!(handle.cancel(), Err(TimerError::Dead));
        assert_eq!(handle.wait_for_expiry(), Err(TimerError::Dead));
        assert!(handle.share().is_none());
    }

    #[test]
    fn test_handle_over_manual_timer() -> TimerResult<()> {
        let mut handle = TimerHandle::from_timer(ManualTimer::new());
        handle.arm(Duration::from_secs(2))?;
        assert!(handle.is_armed());

        let timer = handle.share().ok_or(TimerError::Dead)?;
        assert!(timer.fire());
        assert_eq!(handle.wait_for_expiry()?, WakeReason::Expired);

        handle.destroy();
        assert_eq!(handle.arm(Duration::from_secs(1)), Err(TimerError::Dead));
        Ok(())
    }

    #[test]
    fn test_failed_factory_propagates() {
        let result = TimerHandle::<MonotonicTimer>::create(|| {
            Err(TimerError::resource_exhausted("quota reached"))
        });
        assert!(matches!(result, Err(TimerError::ResourceExhausted(_))));
    }

    #[test]
    fn test_destroy_is_idempotent() -> TimerResult<()> {
        let mut handle = TimerHandle::create(MonotonicTimer::create)?;
        handle.arm(Duration::from_secs(1))?;
        assert!(handle.is_armed());

        handle.destroy();
        handle.destroy();
        assert!(handle.is_dead());
        assert_eq!(handle.cancel(), Err(TimerError::Dead));
        Ok(())
    }

    #[test]
    fn test_shared_timer_outlives_destroy() -> TimerResult<()> {
        let mut handle = TimerHandle::create(MonotonicTimer::create)?;
        let shared = handle.share().ok_or(TimerError::Dead)?;
        handle.destroy();

        shared.arm(Duration::from_millis(1))?;
        assert_eq!(shared.wait_for_expiry(), WakeReason::Expired);
        Ok(())
    }
}
