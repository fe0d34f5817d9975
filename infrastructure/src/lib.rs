//! Infrastructure layer for snaxel
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod engine;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, EngineKind, FileCacheConfig, FileConfig, FileEngineConfig, FileLoggingConfig,
    FileOutputConfig, FileOutputFormat, FileSearchConfig,
};
#[cfg(feature = "http-engine")]
pub use engine::HttpQueryEngine;
pub use engine::{EngineError, FixtureQueryEngine, QueryEngine, parse_engine_response};
pub use logging::JsonlSearchLogger;
