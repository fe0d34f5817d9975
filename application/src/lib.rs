//! Application layer for snaxel
//!
//! This crate contains the search aggregation use case, the result cache,
//! port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod cache;
pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use cache::{CacheConfig, CacheError, CacheKey, ResultCache};
pub use config::BehaviorConfig;
pub use ports::{
    clock::{Clock, ManualClock, SystemClock},
    progress::{NoProgress, ProgressNotifier},
    search_logger::{NoSearchLogger, SearchEvent, SearchLogger},
    source_provider::{LookupOptions, ProviderError, SourceProvider},
};
pub use use_cases::run_search::{RunSearchError, RunSearchUseCase, SearchAllOutput, SearchInput};
