//! Per-source outcome of a lookup

use super::result_item::ResultItem;
use serde::{Deserialize, Serialize};

/// Category of a per-source failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// The provider reported an error
    Provider,
    /// The provider did not answer before the per-source deadline
    Timeout,
    /// The provider could not be reached
    Unavailable,
    /// The lookup task itself broke (panic, lost task)
    Internal,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Provider => "provider",
            FailureKind::Timeout => "timeout",
            FailureKind::Unavailable => "unavailable",
            FailureKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a source failed (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReason {
    pub kind: FailureKind,
    pub message: String,
}

impl FailureReason {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Provider, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Timeout, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Internal, message)
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Outcome of one source's lookup: its results, or why it failed.
///
/// Serialized as `{"results": [...]}` or `{"failure": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceResult {
    Results(Vec<ResultItem>),
    Failure(FailureReason),
}

impl SourceResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SourceResult::Results(_))
    }

    /// Items on success, `None` on failure
    pub fn results(&self) -> Option<&[ResultItem]> {
        match self {
            SourceResult::Results(items) => Some(items),
            SourceResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            SourceResult::Results(_) => None,
            SourceResult::Failure(reason) => Some(reason),
        }
    }

    /// Number of successful results; failures count as zero.
    pub fn count(&self) -> usize {
        self.results().map_or(0, <[ResultItem]>::len)
    }
}
