//! Error types for deadman-demo

use deadman_watchdog::WatchdogError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DemoError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Watchdog unavailable: {0}")]
    WatchdogUnavailable(#[from] WatchdogError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
