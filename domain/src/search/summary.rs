//! Read-only summary projected from an [`Envelope`]

use super::envelope::Envelope;
use crate::core::source::Source;
use serde::{Deserialize, Serialize};

/// Per-source line of a [`SearchSummary`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub source: Source,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Counts derived from an envelope; computes nothing the envelope doesn't hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSummary {
    pub query: String,
    pub total_results: usize,
    pub successful_sources: usize,
    pub failed_sources: usize,
    pub sources: Vec<SourceSummary>,
}

impl SearchSummary {
    pub fn from_envelope(envelope: &Envelope) -> Self {
        let sources: Vec<SourceSummary> = envelope
            .sources
            .iter()
            .map(|(source, result)| SourceSummary {
                source: *source,
                count: result.count(),
                error: result.failure().map(|f| f.message.clone()),
            })
            .collect();

        let failed_sources = sources.iter().filter(|s| s.error.is_some()).count();

        Self {
            query: envelope.query.clone(),
            total_results: envelope.total_results,
            successful_sources: sources.len() - failed_sources,
            failed_sources,
            sources,
        }
    }

    pub fn count_for(&self, source: Source) -> Option<usize> {
        self.sources
            .iter()
            .find(|s| s.source == source)
            .map(|s| s.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{FailureReason, ResultItem, SourceResult};
    use chrono::Utc;
    use std::collections::BTreeMap;

    #[test]
    fn test_summary_counts() {
        let mut sources = BTreeMap::new();
        sources.insert(
            Source::Web,
            SourceResult::Results(vec![
                ResultItem::new("a", "https://a.example"),
                ResultItem::new("b", "https://b.example"),
            ]),
        );
        sources.insert(
            Source::Videos,
            SourceResult::Failure(FailureReason::provider("quota exceeded")),
        );
        let envelope = Envelope::assemble("cats", Utc::now(), sources);

        let summary = SearchSummary::from_envelope(&envelope);
        assert_eq!(summary.total_results, 2);
        assert_eq!(summary.successful_sources, 1);
        assert_eq!(summary.failed_sources, 1);
        assert_eq!(summary.count_for(Source::Web), Some(2));
        assert_eq!(summary.count_for(Source::Videos), Some(0));
        assert_eq!(summary.count_for(Source::Books), None);
        assert_eq!(summary.sources[1].error.as_deref(), Some("quota exceeded"));
    }
}
