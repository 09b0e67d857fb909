//! Prelude for deadman-watchdog.
//!
//! This module re-exports the most commonly used types for convenient importing.

pub use crate::action::{ExpiryAction, ExpiryCallback, ExpiryFn};
pub use crate::config::{UnexpectedWakePolicy, WatchdogConfig};
pub use crate::engine::WatchdogEngine;
pub use crate::error::{WatchdogError, WatchdogResult};
pub use crate::metrics::WatchdogMetrics;
pub use crate::state::EngineStatus;
pub use crate::watchdog::Watchdog;
