//! Search configuration from TOML (`[search]` section)
//!
//! ```toml
//! [search]
//! default_limit = 10
//! default_sources = ["web", "news"]
//! source_timeout_secs = 30   # 0 disables the per-source deadline
//! ```

use serde::{Deserialize, Serialize};
use snaxel_domain::{ConfigIssue, ConfigIssueCode, Source, SourceSet};

/// Raw search configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSearchConfig {
    /// Base number of results per source
    pub default_limit: usize,
    /// Sources used when the command line names none
    pub default_sources: Vec<String>,
    /// Per-source deadline in seconds
    pub source_timeout_secs: u64,
}

impl Default for FileSearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            default_sources: vec![Source::Web.as_str().to_string()],
            source_timeout_secs: 30,
        }
    }
}

impl FileSearchConfig {
    /// Parse `default_sources`, reporting identifiers outside the known domain
    pub fn parse_default_sources(&self) -> (SourceSet, Vec<ConfigIssue>) {
        let (set, ignored) = SourceSet::from_identifiers(&self.default_sources);
        let mut issues: Vec<ConfigIssue> = ignored
            .into_iter()
            .map(|value| {
                let message = format!("search.default_sources: unknown source '{}' is ignored", value);
                ConfigIssue::warning(
                    ConfigIssueCode::UnknownSource {
                        field: "search.default_sources".to_string(),
                        value,
                    },
                    message,
                )
            })
            .collect();

        if set.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingField {
                    field: "search.default_sources".to_string(),
                },
                "search.default_sources: no recognized source configured",
            ));
        }

        (set, issues)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_default_sources().1;
        if self.default_limit == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroValue {
                    field: "search.default_limit".to_string(),
                },
                "search.default_limit must be at least 1",
            ));
        }
        issues
    }
}
