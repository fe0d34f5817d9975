//! Domain layer for snaxel
//!
//! This crate contains the core value objects and entities of a multi-source
//! search. It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Query**: trimmed search text; identity uses its case-folded form
//! - **Source / SourceSet**: result categories (web, images, videos, news,
//!   books) and the set a caller requested
//! - **SourceResult**: either the items a source returned or why it failed
//! - **Envelope**: the merged response of one search, listing sources in
//!   canonical order

pub mod config;
pub mod core;
pub mod search;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{
    error::DomainError,
    query::Query,
    source::{Source, SourceSet},
};
pub use search::{
    Envelope, FailureKind, FailureReason, ResultItem, SearchSummary, SourceResult, SourceSummary,
};
