//! Query engine adapters implementing the [`SourceProvider`] port
//!
//! [`QueryEngine`] selects the adapter named by `[engine] kind` at startup
//! and delegates every lookup to it.

mod error;
mod fixture;
#[cfg(feature = "http-engine")]
mod http;
mod response;

pub use error::EngineError;
pub use fixture::FixtureQueryEngine;
#[cfg(feature = "http-engine")]
pub use http::HttpQueryEngine;
pub use response::parse_engine_response;

use crate::config::{EngineKind, FileEngineConfig};
use async_trait::async_trait;
use snaxel_application::{LookupOptions, ProviderError, SourceProvider};
use snaxel_domain::{ResultItem, Source};

/// The configured query engine
pub enum QueryEngine {
    #[cfg(feature = "http-engine")]
    Http(HttpQueryEngine),
    Fixture(FixtureQueryEngine),
}

impl QueryEngine {
    pub fn from_config(config: &FileEngineConfig) -> Result<Self, EngineError> {
        match config.kind {
            EngineKind::Http => http_engine(config),
            EngineKind::Fixture => {
                let path = config
                    .fixture_path
                    .as_ref()
                    .ok_or(EngineError::MissingFixturePath)?;
                Ok(Self::Fixture(FixtureQueryEngine::load(path)?))
            }
        }
    }

    /// Short human-readable description for `--show-config` and logs
    pub fn describe(&self) -> String {
        match self {
            #[cfg(feature = "http-engine")]
            Self::Http(engine) => format!("http ({})", engine.base_url()),
            Self::Fixture(_) => "fixture".to_string(),
        }
    }
}

#[cfg(feature = "http-engine")]
fn http_engine(config: &FileEngineConfig) -> Result<QueryEngine, EngineError> {
    Ok(QueryEngine::Http(HttpQueryEngine::new(config)?))
}

#[cfg(not(feature = "http-engine"))]
fn http_engine(_config: &FileEngineConfig) -> Result<QueryEngine, EngineError> {
    Err(EngineError::HttpDisabled)
}

#[async_trait]
impl SourceProvider for QueryEngine {
    async fn lookup(
        &self,
        source: Source,
        query: &str,
        options: &LookupOptions,
    ) -> Result<Vec<ResultItem>, ProviderError> {
        match self {
            #[cfg(feature = "http-engine")]
            Self::Http(engine) => engine.lookup(source, query, options).await,
            Self::Fixture(engine) => engine.lookup(source, query, options).await,
        }
    }
}
