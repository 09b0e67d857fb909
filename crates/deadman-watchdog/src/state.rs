//! Background thread lifecycle state.
//!
//! ```text
//! Starting ──► Ready ──► ShuttingDown ──► Terminated
//!     │
//!     └──► Failed   (timer or thread could not be created)
//! ```

use core::fmt;
use portable_atomic::{AtomicU32, Ordering};

/// Lifecycle status of a watchdog's background thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum EngineStatus {
    /// Construction in progress, thread not yet confirmed running.
    #[default]
    Starting = 0,
    /// Thread is running and waiting on the timer.
    Ready = 1,
    /// Destruction has begun; the thread will not dispatch again.
    ShuttingDown = 2,
    /// Thread has exited.
    Terminated = 3,
    /// Resources could not be created; the watchdog does not watch.
    Failed = 4,
}

impl EngineStatus {
    /// Convert from raw u32 value.
    #[must_use]
    pub fn from_raw(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Starting),
            1 => Some(Self::Ready),
            2 => Some(Self::ShuttingDown),
            3 => Some(Self::Terminated),
            4 => Some(Self::Failed),
            _ => None,
        }
    }

    /// Convert to raw u32 value.
    #[must_use]
    pub fn to_raw(self) -> u32 {
        self as u32
    }

    /// Check if no further transitions can happen.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Terminated | Self::Failed)
    }

    /// Get the status as a string slice.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "Starting",
            Self::Ready => "Ready",
            Self::ShuttingDown => "ShuttingDown",
            Self::Terminated => "Terminated",
            Self::Failed => "Failed",
        }
    }
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Atomic cell holding an [`EngineStatus`], shared with the background thread.
#[derive(Debug)]
pub struct EngineState {
    status: AtomicU32,
}

impl EngineState {
    /// Create a new state in `Starting`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: AtomicU32::new(EngineStatus::Starting.to_raw()),
        }
    }

    /// Get the current status.
    #[must_use]
    pub fn status(&self) -> EngineStatus {
        let raw = self.status.load(Ordering::Acquire);
        EngineStatus::from_raw(raw).unwrap_or(EngineStatus::Failed)
    }

    /// Move from `from` to `to`. Returns `false` if the state was not `from`.
    pub fn advance(&self, from: EngineStatus, to: EngineStatus) -> bool {
        self.status
            .compare_exchange(
                from.to_raw(),
                to.to_raw(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Enter `ShuttingDown` from any non-terminal state.
    ///
    /// Returns the status observed before the change.
    pub fn begin_shutdown(&self) -> EngineStatus {
        let mut current = self.status();
        while !current.is_terminal() && current != EngineStatus::ShuttingDown {
            if self.advance(current, EngineStatus::ShuttingDown) {
                break;
            }
            current = self.status();
        }
        current
    }

    /// Mark the engine as failed.
    pub fn fail(&self) {
        self.status
            .store(EngineStatus::Failed.to_raw(), Ordering::Release);
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}
