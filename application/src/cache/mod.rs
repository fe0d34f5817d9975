//! Result cache
//!
//! Memoizes envelopes by (normalized query, source set) for a fixed TTL.

mod result_cache;

pub use result_cache::{CacheConfig, CacheError, CacheKey, DEFAULT_TTL, ResultCache};
