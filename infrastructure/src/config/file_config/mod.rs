//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod cache;
mod engine;
mod logging;
mod output;
mod search;

pub use cache::FileCacheConfig;
pub use engine::{EngineKind, FileEngineConfig};
pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use search::FileSearchConfig;

use serde::{Deserialize, Serialize};
use snaxel_application::BehaviorConfig;
use snaxel_domain::ConfigIssue;
use std::time::Duration;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Search defaults
    pub search: FileSearchConfig,
    /// Result cache settings
    pub cache: FileCacheConfig,
    /// Query engine adapter settings
    pub engine: FileEngineConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Structured search log
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.search.validate());
        issues.extend(self.cache.validate());
        issues.extend(self.engine.validate());
        issues
    }

    /// Application behavior derived from `[search]`
    pub fn behavior_config(&self) -> BehaviorConfig {
        BehaviorConfig {
            default_limit: self.search.default_limit,
            source_timeout: (self.search.source_timeout_secs > 0)
                .then(|| Duration::from_secs(self.search.source_timeout_secs)),
        }
    }
}
