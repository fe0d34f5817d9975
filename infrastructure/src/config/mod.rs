//! Configuration file loading for snaxel
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SNAXEL_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./snaxel.toml` or `./.snaxel.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/snaxel/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    EngineKind, FileCacheConfig, FileConfig, FileEngineConfig, FileLoggingConfig,
    FileOutputConfig, FileOutputFormat, FileSearchConfig,
};
pub use loader::ConfigLoader;
