//! Result cache configuration from TOML (`[cache]` section)
//!
//! ```toml
//! [cache]
//! ttl_secs = 300
//! max_entries = 1000        # omit for no bound
//! sweep_interval_secs = 60  # 0 disables the background sweep
//! ```

use serde::{Deserialize, Serialize};
use snaxel_application::CacheConfig;
use snaxel_domain::{ConfigIssue, ConfigIssueCode};
use std::time::Duration;

/// Raw cache configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCacheConfig {
    pub ttl_secs: u64,
    pub max_entries: Option<usize>,
    pub sweep_interval_secs: u64,
}

impl Default for FileCacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            max_entries: None,
            sweep_interval_secs: 60,
        }
    }
}

impl FileCacheConfig {
    pub fn to_cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl: Duration::from_secs(self.ttl_secs),
            max_entries: self.max_entries,
        }
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.ttl_secs == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroValue {
                    field: "cache.ttl_secs".to_string(),
                },
                "cache.ttl_secs is 0: every search will hit the providers",
            ));
        }
        if self.max_entries == Some(0) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroValue {
                    field: "cache.max_entries".to_string(),
                },
                "cache.max_entries must be at least 1 (omit it for no bound)",
            ));
        }
        issues
    }
}
