//! # Shop Configuration
//!
//! Runtime knobs for the shop services. The API binary fills this from
//! environment variables; tests build it directly.
//!
//! ```text
//! ShopConfig
//! ├── notify_mode   Inline     checkout awaits every handler
//! │                 Background checkout returns, handlers run on a task
//! └── retry         attempts and backoff for transient storage errors
//! ```

use std::str::FromStr;
use std::time::Duration;

use backoff::ExponentialBackoff;

// =============================================================================
// Notify Mode
// =============================================================================

/// When order handlers run relative to the checkout response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyMode {
    /// Checkout returns after all handlers finished.
    #[default]
    Inline,
    /// Checkout returns as soon as the order is committed.
    Background,
}

impl NotifyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyMode::Inline => "inline",
            NotifyMode::Background => "background",
        }
    }
}

impl std::fmt::Display for NotifyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotifyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inline" => Ok(NotifyMode::Inline),
            "background" => Ok(NotifyMode::Background),
            other => Err(format!("unknown notify mode '{}' (expected inline|background)", other)),
        }
    }
}

// =============================================================================
// Retry Policy
// =============================================================================

/// Retry budget for transient storage errors (busy database, exhausted pool).
///
/// Permanent errors are never retried.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Zero disables retrying.
    pub max_retries: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            initial_interval: Duration::from_millis(50),
            max_interval: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        RetryPolicy {
            max_retries: 0,
            ..Default::default()
        }
    }

    pub(crate) fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.initial_interval,
            max_interval: self.max_interval,
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

// =============================================================================
// Shop Config
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct ShopConfig {
    pub notify_mode: NotifyMode,
    pub retry: RetryPolicy,
}

impl ShopConfig {
    pub fn notify_mode(mut self, mode: NotifyMode) -> Self {
        self.notify_mode = mode;
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.retry.max_retries = retries;
        self
    }
}
