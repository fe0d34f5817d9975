//! Progress notification port
//!
//! Defines the interface for reporting progress during a search.

use snaxel_domain::{Envelope, Source, SourceSet};

/// Callback for progress updates during a search
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, progress bars, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called before providers are dispatched
    fn on_search_start(&self, query: &str, sources: &SourceSet);

    /// Called when one source settles, in completion order
    fn on_source_complete(&self, source: Source, success: bool);

    /// Called once the envelope is assembled
    fn on_search_complete(&self, envelope: &Envelope);

    /// Called when the envelope was served from the cache
    fn on_cache_hit(&self, _query: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_search_start(&self, _query: &str, _sources: &SourceSet) {}
    fn on_source_complete(&self, _source: Source, _success: bool) {}
    fn on_search_complete(&self, _envelope: &Envelope) {}
}
