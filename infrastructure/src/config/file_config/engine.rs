//! Query engine configuration from TOML (`[engine]` section)
//!
//! ```toml
//! [engine]
//! kind = "http"                          # or "fixture"
//! base_url = "http://localhost:3000/api"
//! request_timeout_secs = 30
//!
//! # kind = "fixture"
//! # fixture_path = "./fixtures/results.json"
//! ```

use serde::{Deserialize, Serialize};
use snaxel_domain::{ConfigIssue, ConfigIssueCode};
use std::path::PathBuf;

/// Which adapter serves source lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Remote query engine over HTTP
    #[default]
    Http,
    /// Canned results from a local JSON file
    Fixture,
}

/// Raw query engine configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEngineConfig {
    pub kind: EngineKind,
    pub base_url: String,
    pub fixture_path: Option<PathBuf>,
    /// Transport-level timeout for one HTTP request
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FileEngineConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::Http,
            base_url: "http://localhost:3000/api".to_string(),
            fixture_path: None,
            request_timeout_secs: 30,
            user_agent: format!("snaxel/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FileEngineConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        match self.kind {
            EngineKind::Fixture if self.fixture_path.is_none() => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::MissingField {
                        field: "engine.fixture_path".to_string(),
                    },
                    "engine.kind = \"fixture\" requires engine.fixture_path",
                ));
            }
            EngineKind::Http if self.base_url.trim().is_empty() => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::MissingField {
                        field: "engine.base_url".to_string(),
                    },
                    "engine.kind = \"http\" requires engine.base_url",
                ));
            }
            _ => {}
        }
        issues
    }
}
