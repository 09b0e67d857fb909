//! Watchdog configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{WatchdogError, WatchdogResult};

/// Delay used by `start()` until another one is set: 5 minutes.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(5 * 60);

/// Bounded wait for the background thread to report readiness.
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper limit accepted for `startup_timeout`.
pub const MAX_STARTUP_TIMEOUT: Duration = Duration::from_secs(60);

/// What the background thread does when the timer wakes it for a reason it
/// cannot classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnexpectedWakePolicy {
    /// Log the wake and run the expiry action.
    #[default]
    Dispatch,
    /// Log the wake and go back to waiting without running the action.
    Rewait,
}

/// Watchdog configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchdogConfig {
    /// Delay used by `start()` calls that do not pass one.
    pub default_delay: Duration,
    /// How long construction waits for the background thread.
    pub startup_timeout: Duration,
    /// Handling of unclassified timer wakes.
    pub unexpected_wake: UnexpectedWakePolicy,
    /// Catch panics raised by the expiry action and keep watching.
    pub catch_panics: bool,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            default_delay: DEFAULT_DELAY,
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
            unexpected_wake: UnexpectedWakePolicy::default(),
            catch_panics: true,
        }
    }
}

impl WatchdogConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> WatchdogResult<()> {
        if self.default_delay.is_zero() {
            return Err(WatchdogError::invalid_configuration(
                "default_delay must be greater than 0",
            ));
        }
        if self.startup_timeout.is_zero() {
            return Err(WatchdogError::invalid_configuration(
                "startup_timeout must be greater than 0",
            ));
        }
        if self.startup_timeout > MAX_STARTUP_TIMEOUT {
            return Err(WatchdogError::invalid_configuration(
                "startup_timeout must not exceed 60s",
            ));
        }
        Ok(())
    }

    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> WatchdogConfigBuilder {
        WatchdogConfigBuilder::default()
    }
}

/// Builder for `WatchdogConfig`.
#[derive(Debug, Default)]
pub struct WatchdogConfigBuilder {
    config: WatchdogConfig,
}

impl WatchdogConfigBuilder {
    /// Set the default delay.
    #[must_use]
    pub fn default_delay(mut self, delay: Duration) -> Self {
        self.config.default_delay = delay;
        self
    }

    /// Set the default delay in milliseconds.
    #[must_use]
    pub fn default_delay_ms(self, ms: u64) -> Self {
        self.default_delay(Duration::from_millis(ms))
    }

    /// Set the startup timeout.
    #[must_use]
    pub fn startup_timeout(mut self, timeout: Duration) -> Self {
        self.config.startup_timeout = timeout;
        self
    }

    /// Set the unexpected wake policy.
    #[must_use]
    pub fn unexpected_wake(mut self, policy: UnexpectedWakePolicy) -> Self {
        self.config.unexpected_wake = policy;
        self
    }

    /// Enable or disable catching panics from the expiry action.
    #[must_use]
    pub fn catch_panics(mut self, enabled: bool) -> Self {
        self.config.catch_panics = enabled;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> WatchdogResult<WatchdogConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
