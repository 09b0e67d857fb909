//! # deadman-timer
//!
//! Single-shot waitable timer primitive for the deadman watchdog.
//!
//! A waitable timer is armed with a delay, signals exactly once when the
//! resulting deadline passes, and can be canceled from any thread to wake a
//! blocked waiter deterministically.
//!
//! ## Architecture
//!
//! - [`timer`] - The [`WaitableTimer`] capability trait, [`WakeReason`] and
//!   delay-to-deadline conversion
//! - [`monotonic`] - [`MonotonicTimer`], the portable implementation built on
//!   the monotonic clock
//! - [`handle`] - [`TimerHandle`], an owning wrapper that degrades to a
//!   "dead" primitive when creation fails
//! - `manual` - `ManualTimer`, a scripted timer for deterministic tests,
//!   available with the `test-utils` feature
//! - [`error`] - Timer error types
//!
//! ## Semantics
//!
//! Timers are synchronization timers:
//!
//! - Re-arming replaces the pending deadline.
//! - An elapsed deadline stays signaled until a waiter consumes it.
//! - `cancel()` clears the deadline and leaves a pending cancel that the
//!   current or next waiter observes as [`WakeReason::Canceled`].
//!
//! ## Example
//!
//! ```rust
//! use deadman_timer::prelude::*;
//! use std::time::Duration;
//!
//! let timer = MonotonicTimer::create().expect("timer");
//! timer.arm(Duration::from_millis(5)).expect("arm");
//! assert_eq!(timer.wait_for_expiry(), WakeReason::Expired);
//! assert!(!timer.is_armed());
//! ```

#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod handle;
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod manual;
pub mod monotonic;
pub mod timer;

pub mod prelude;

pub use error::{TimerError, TimerResult};
pub use handle::TimerHandle;
#[cfg(any(test, feature = "test-utils"))]
pub use manual::ManualTimer;
pub use monotonic::MonotonicTimer;
pub use timer::{MAX_DELAY, MIN_DELAY, WaitableTimer, WakeReason, deadline_after, effective_delay};
