//! Error types for query engine construction

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building a query engine adapter
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("engine.fixture_path is required when engine.kind = \"fixture\"")]
    MissingFixturePath,

    #[error("Failed to read fixture file {path}: {source}")]
    FixtureRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid fixture file {path}: {source}")]
    FixtureParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP engine support is not compiled in (enable the `http-engine` feature)")]
    HttpDisabled,

    #[cfg(feature = "http-engine")]
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
