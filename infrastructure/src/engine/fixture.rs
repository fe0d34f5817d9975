//! Fixture query engine backed by a local JSON file.
//!
//! Useful for demos and offline runs. The file maps source identifiers to
//! either a list of result items or an error:
//!
//! ```json
//! {
//!   "web":  [ { "title": "Rust", "url": "https://www.rust-lang.org" } ],
//!   "news": { "error": "news backend offline" }
//! }
//! ```
//!
//! Sources absent from the file return no results.

use super::error::EngineError;
use async_trait::async_trait;
use serde::Deserialize;
use snaxel_application::{LookupOptions, ProviderError, SourceProvider};
use snaxel_domain::{ResultItem, Source};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FixtureEntry {
    Items(Vec<ResultItem>),
    Failure { error: String },
}

/// Query engine that serves canned results
#[derive(Debug, Clone, Default)]
pub struct FixtureQueryEngine {
    entries: BTreeMap<Source, FixtureEntry>,
}

impl FixtureQueryEngine {
    /// Load fixtures from a JSON file
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path).map_err(|source| EngineError::FixtureRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| EngineError::FixtureParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    /// Sources that have an entry in the fixture
    pub fn sources(&self) -> impl Iterator<Item = Source> + '_ {
        self.entries.keys().copied()
    }
}

#[async_trait]
impl SourceProvider for FixtureQueryEngine {
    async fn lookup(
        &self,
        source: Source,
        query: &str,
        options: &LookupOptions,
    ) -> Result<Vec<ResultItem>, ProviderError> {
        debug!("Fixture lookup {} for '{}'", source, query);
        match self.entries.get(&source) {
            None => Ok(Vec::new()),
            Some(FixtureEntry::Items(items)) => {
                Ok(items.iter().take(options.limit).cloned().collect())
            }
            Some(FixtureEntry::Failure { error }) => {
                Err(ProviderError::RequestFailed(error.clone()))
            }
        }
    }
}
