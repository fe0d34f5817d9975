//! Source provider port
//!
//! Defines the contract of the external query engine: one lookup per source.

use async_trait::async_trait;
use snaxel_domain::{FailureKind, FailureReason, ResultItem, Source};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors a provider can report for a single lookup
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Timeout")]
    Timeout,
}

impl ProviderError {
    /// Failure category recorded in the envelope for this error
    pub fn kind(&self) -> FailureKind {
        match self {
            ProviderError::Unavailable(_) => FailureKind::Unavailable,
            ProviderError::Timeout => FailureKind::Timeout,
            ProviderError::RequestFailed(_) | ProviderError::InvalidResponse(_) => {
                FailureKind::Provider
            }
        }
    }
}

impl From<ProviderError> for FailureReason {
    fn from(error: ProviderError) -> Self {
        FailureReason::new(error.kind(), error.to_string())
    }
}

/// Options for a single source lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOptions {
    /// Maximum number of results to return
    pub limit: usize,
    /// Source-specific parameters, passed through untouched
    pub params: BTreeMap<String, String>,
}

impl LookupOptions {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            params: BTreeMap::new(),
        }
    }

    /// Options for `source` given the caller's base limit.
    ///
    /// Applies the per-source limit policy ([`Source::limit_multiplier`]).
    pub fn for_source(source: Source, limit: usize) -> Self {
        Self::new(limit.saturating_mul(source.limit_multiplier()))
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Gateway to the external query engine
///
/// Each call is independent and shares no mutable state with other calls.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Fetch results for `query` from `source`, in provider order
    async fn lookup(
        &self,
        source: Source,
        query: &str,
        options: &LookupOptions,
    ) -> Result<Vec<ResultItem>, ProviderError>;
}
