//! The merged response of one aggregation run

use super::source_result::SourceResult;
use crate::core::source::Source;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate response for a search (Entity)
///
/// `sources` is keyed by [`Source`], whose ordering is canonical, so the
/// presentation order never depends on which provider answered first.
/// Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// The trimmed query text
    pub query: String,
    pub timestamp: DateTime<Utc>,
    pub sources: BTreeMap<Source, SourceResult>,
    /// Sum of successful result counts; failed sources contribute zero
    pub total_results: usize,
}

impl Envelope {
    /// Assemble an envelope and derive its total.
    pub fn assemble(
        query: impl Into<String>,
        timestamp: DateTime<Utc>,
        sources: BTreeMap<Source, SourceResult>,
    ) -> Self {
        let total_results = sources.values().map(SourceResult::count).sum();
        Self {
            query: query.into(),
            timestamp,
            sources,
            total_results,
        }
    }

    pub fn get(&self, source: Source) -> Option<&SourceResult> {
        self.sources.get(&source)
    }

    /// Sources whose lookup failed, in canonical order
    pub fn failed_sources(&self) -> impl Iterator<Item = (Source, &SourceResult)> {
        self.sources
            .iter()
            .filter(|(_, r)| !r.is_success())
            .map(|(s, r)| (*s, r))
    }

    pub fn has_failures(&self) -> bool {
        self.sources.values().any(|r| !r.is_success())
    }
}
