//! # deadman-watchdog
//!
//! Deadman-switch watchdog: the application arms a deadline and must cancel
//! or rearm it before it passes. If it does not, an expiry action runs on a
//! dedicated background thread, typically to capture diagnostics from a hung
//! process.
//!
//! ## Architecture
//!
//! - [`engine`] - [`WatchdogEngine`], which owns the timer and background
//!   thread and drives the lifecycle
//! - [`watchdog`] - [`Watchdog`], binding a plain function and context as the
//!   expiry action
//! - [`action`] - The [`ExpiryAction`] trait
//! - [`config`] - Configuration with defaults and validation
//! - [`state`] - Lifecycle status shared with the background thread
//! - [`metrics`] - Lock-free counters
//! - [`error`] - Watchdog error types
//!
//! ## Guarantees
//!
//! - Arming replaces any pending deadline; only the last `start()` counts.
//! - One expiry runs the action at most once. Rearm to watch again.
//! - Dropping the watchdog wakes the background thread, waits for it to exit
//!   and never runs the action afterwards.
//! - A watchdog that failed to construct is still safe to use and drop; its
//!   operations are no-ops.
//!
//! ## Example
//!
//! ```rust
//! use deadman_watchdog::prelude::*;
//! use std::time::Duration;
//!
//! let watchdog = WatchdogEngine::new("frame-pump", WatchdogConfig::default(), || {
//!     eprintln!("frame pump hung");
//! });
//! assert!(watchdog.is_valid());
//!
//! for _frame in 0..3 {
//!     watchdog.start(Duration::from_secs(2));
//!     // ... do the work being watched ...
//!     watchdog.stop();
//! }
//! assert_eq!(watchdog.metrics().expiries, 0);
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

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod state;
pub mod watchdog;

pub mod prelude;

pub use action::{ExpiryAction, ExpiryCallback, ExpiryFn};
pub use config::{
    DEFAULT_DELAY, DEFAULT_STARTUP_TIMEOUT, MAX_STARTUP_TIMEOUT, UnexpectedWakePolicy,
    WatchdogConfig, WatchdogConfigBuilder,
};
pub use engine::WatchdogEngine;
pub use error::{WatchdogError, WatchdogResult};
pub use metrics::{WatchdogCounters, WatchdogMetrics};
pub use state::{EngineState, EngineStatus};
pub use watchdog::Watchdog;

pub use deadman_timer as timer;
