//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave,
//! such as result limits and per-source deadlines.

use std::time::Duration;

/// Result limit used when the caller does not give one
pub const DEFAULT_LIMIT: usize = 10;

/// Per-source deadline used when none is configured
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(30);

/// Application behavior configuration.
#[derive(Debug, Clone)]
pub struct BehaviorConfig {
    /// Base result limit per source.
    pub default_limit: usize,
    /// Maximum time a single provider lookup may take. `None` waits forever.
    pub source_timeout: Option<Duration>,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            source_timeout: Some(DEFAULT_SOURCE_TIMEOUT),
        }
    }
}

impl BehaviorConfig {
    /// Creates a BehaviorConfig with a per-source timeout specified in seconds.
    pub fn with_timeout_seconds(seconds: u64) -> Self {
        Self {
            source_timeout: Some(Duration::from_secs(seconds)),
            ..Self::default()
        }
    }

    /// Creates a BehaviorConfig from an optional timeout in seconds.
    ///
    /// If `seconds` is `None`, no timeout is applied.
    pub fn from_timeout_seconds(seconds: Option<u64>) -> Self {
        Self {
            source_timeout: seconds.map(Duration::from_secs),
            ..Self::default()
        }
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }
}
