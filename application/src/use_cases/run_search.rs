//! Run Search use case
//!
//! Fans one search out to every requested source, waits for all of them to
//! settle, and merges the outcomes into a single [`Envelope`]. Envelopes are
//! memoized in the [`ResultCache`] so repeated searches skip the providers.

use crate::cache::{CacheError, ResultCache};
use crate::config::BehaviorConfig;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::search_logger::{NoSearchLogger, SearchEvent, SearchLogger};
use crate::ports::source_provider::{LookupOptions, SourceProvider};
use chrono::Utc;
use futures::FutureExt;
use snaxel_domain::{
    Envelope, FailureReason, Query, SearchSummary, Source, SourceResult, SourceSet,
};
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that abort a whole search
///
/// Per-source failures never show up here; they are recorded inside the
/// envelope.
#[derive(Error, Debug)]
pub enum RunSearchError {
    #[error("Query cannot be empty")]
    InvalidQuery,

    #[error("No recognized sources requested")]
    NoSources,

    #[error("Infrastructure failure: {0}")]
    Infrastructure(String),

    #[error("Search cancelled")]
    Cancelled,
}

impl RunSearchError {
    /// `true` for errors caused by the request itself rather than the system
    pub fn is_bad_request(&self) -> bool {
        matches!(self, RunSearchError::InvalidQuery | RunSearchError::NoSources)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunSearchError::Cancelled)
    }
}

impl From<CacheError> for RunSearchError {
    fn from(error: CacheError) -> Self {
        RunSearchError::Infrastructure(error.to_string())
    }
}

/// Input for the RunSearch use case
#[derive(Debug, Clone)]
pub struct SearchInput {
    /// Raw query text as typed by the user
    pub query: String,
    /// Raw source identifiers; unknown ones are ignored
    pub sources: Vec<String>,
    /// Base result limit; falls back to [`BehaviorConfig::default_limit`]
    pub limit: Option<usize>,
    /// Explicit per-source options, replacing the derived ones
    pub options: BTreeMap<Source, LookupOptions>,
    /// Aborts the search when cancelled
    pub cancel: Option<CancellationToken>,
}

impl SearchInput {
    /// Search `query` on the web source with the default limit
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            sources: vec![Source::Web.as_str().to_string()],
            limit: None,
            options: BTreeMap::new(),
            cancel: None,
        }
    }

    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_options(mut self, source: Source, options: LookupOptions) -> Self {
        self.options.insert(source, options);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Output of a search across every source
#[derive(Debug, Clone)]
pub struct SearchAllOutput {
    pub envelope: Envelope,
    pub summary: SearchSummary,
}

/// Use case for running a multi-source search
pub struct RunSearchUseCase<P: SourceProvider + 'static> {
    provider: Arc<P>,
    cache: Arc<ResultCache>,
    config: BehaviorConfig,
    logger: Arc<dyn SearchLogger>,
}

impl<P: SourceProvider + 'static> RunSearchUseCase<P> {
    pub fn new(provider: Arc<P>, cache: Arc<ResultCache>) -> Self {
        Self {
            provider,
            cache,
            config: BehaviorConfig::default(),
            logger: Arc::new(NoSearchLogger),
        }
    }

    pub fn with_config(mut self, config: BehaviorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn SearchLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: SearchInput) -> Result<Envelope, RunSearchError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: SearchInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<Envelope, RunSearchError> {
        let query = Query::parse(&input.query).map_err(|_| RunSearchError::InvalidQuery)?;

        let (sources, ignored) = SourceSet::from_identifiers(&input.sources);
        if !ignored.is_empty() {
            debug!("Ignoring unknown sources: {}", ignored.join(", "));
        }
        if sources.is_empty() {
            return Err(RunSearchError::NoSources);
        }

        if let Some(envelope) = self.cache.get(&query, &sources)? {
            info!("Serving '{}' [{}] from cache", query, sources);
            progress.on_cache_hit(query.text());
            return Ok(envelope);
        }

        info!("Searching '{}' across {} sources", query, sources.len());
        progress.on_search_start(query.text(), &sources);

        let limit = input.limit.unwrap_or(self.config.default_limit);
        let results = self
            .dispatch(&query, &sources, limit, &input.options, input.cancel.as_ref(), progress)
            .await?;

        let envelope = Envelope::assemble(query.text(), Utc::now(), results);
        self.cache.put(&query, &sources, envelope.clone())?;
        self.log_envelope(&envelope);

        progress.on_search_complete(&envelope);
        Ok(envelope)
    }

    /// Search every known source and summarize the outcome
    pub async fn execute_all(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<SearchAllOutput, RunSearchError> {
        self.execute_all_with_progress(query, limit, None, &NoProgress).await
    }

    /// Search every known source, aborting with `Cancelled` once `cancel` fires
    pub async fn execute_all_with_progress(
        &self,
        query: &str,
        limit: Option<usize>,
        cancel: Option<CancellationToken>,
        progress: &dyn ProgressNotifier,
    ) -> Result<SearchAllOutput, RunSearchError> {
        let mut input = SearchInput::new(query).with_sources(Source::ALL.map(|s| s.as_str()));
        input.limit = limit;
        input.cancel = cancel;

        let envelope = self.execute_with_progress(input, progress).await?;
        let summary = SearchSummary::from_envelope(&envelope);
        Ok(SearchAllOutput { envelope, summary })
    }

    /// Look up a single source directly, bypassing the cache.
    ///
    /// An explicit `limit` is passed through unchanged. Without one, the
    /// source's limit policy applies to the default limit, so an image lookup
    /// asks for twice the usual count.
    pub async fn execute_single(
        &self,
        source: Source,
        query: &str,
        limit: Option<usize>,
    ) -> Result<SourceResult, RunSearchError> {
        let query = Query::parse(query).map_err(|_| RunSearchError::InvalidQuery)?;
        let options = match limit {
            Some(limit) => LookupOptions::new(limit),
            None => LookupOptions::for_source(source, self.config.default_limit),
        };

        debug!("Single lookup on {} with limit {}", source, options.limit);
        let result = lookup_source(
            self.provider.as_ref(),
            source,
            query.text(),
            &options,
            self.config.source_timeout,
        )
        .await;

        self.logger.log(SearchEvent::new(
            "single_lookup",
            serde_json::json!({
                "query": query.text(),
                "source": source,
                "limit": options.limit,
                "count": result.count(),
                "failure": result.failure(),
            }),
        ));

        Ok(result)
    }

    /// Run one lookup per source concurrently and wait for all of them.
    async fn dispatch(
        &self,
        query: &Query,
        sources: &SourceSet,
        limit: usize,
        overrides: &BTreeMap<Source, LookupOptions>,
        cancel: Option<&CancellationToken>,
        progress: &dyn ProgressNotifier,
    ) -> Result<BTreeMap<Source, SourceResult>, RunSearchError> {
        let mut join_set = JoinSet::new();

        for source in sources.iter() {
            let provider = Arc::clone(&self.provider);
            let options = overrides
                .get(&source)
                .cloned()
                .unwrap_or_else(|| LookupOptions::for_source(source, limit));
            let text = query.text().to_string();
            let timeout = self.config.source_timeout;

            join_set.spawn(async move {
                let result = lookup_source(provider.as_ref(), source, &text, &options, timeout).await;
                (source, result)
            });
        }

        let mut results = BTreeMap::new();

        loop {
            let joined = match cancel {
                Some(token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        warn!("Search '{}' cancelled before all sources settled", query);
                        return Err(RunSearchError::Cancelled);
                    }
                    joined = join_set.join_next() => joined,
                },
                None => join_set.join_next().await,
            };

            let Some(joined) = joined else {
                break;
            };

            match joined {
                Ok((source, result)) => {
                    match result.failure() {
                        None => debug!("Source {} returned {} results", source, result.count()),
                        Some(reason) => warn!("Source {} failed: {}", source, reason),
                    }
                    progress.on_source_complete(source, result.is_success());
                    results.insert(source, result);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        // A lost task still owes its source an entry
        for source in sources.iter() {
            results.entry(source).or_insert_with(|| {
                progress.on_source_complete(source, false);
                SourceResult::Failure(FailureReason::internal(format!(
                    "lookup task for {} did not complete",
                    source
                )))
            });
        }

        Ok(results)
    }

    fn log_envelope(&self, envelope: &Envelope) {
        let failed: Vec<&str> = envelope.failed_sources().map(|(s, _)| s.as_str()).collect();
        self.logger.log(SearchEvent::new(
            "search_completed",
            serde_json::json!({
                "query": envelope.query,
                "sources": envelope.sources.keys().collect::<Vec<_>>(),
                "total_results": envelope.total_results,
                "failed": failed,
            }),
        ));
    }
}

/// Look up one source, folding every kind of failure into the result.
async fn lookup_source<P: SourceProvider + ?Sized>(
    provider: &P,
    source: Source,
    query: &str,
    options: &LookupOptions,
    timeout: Option<Duration>,
) -> SourceResult {
    let lookup = AssertUnwindSafe(provider.lookup(source, query, options)).catch_unwind();

    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, lookup).await {
            Ok(outcome) => outcome,
            Err(_) => {
                return SourceResult::Failure(FailureReason::timeout(format!(
                    "{} did not respond within {:?}",
                    source, limit
                )));
            }
        },
        None => lookup.await,
    };

    match outcome {
        Ok(Ok(items)) => SourceResult::Results(items),
        Ok(Err(e)) => SourceResult::Failure(e.into()),
        Err(_) => SourceResult::Failure(FailureReason::internal(format!(
            "{} lookup panicked",
            source
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use crate::ports::clock::ManualClock;
    use crate::ports::source_provider::ProviderError;
    use async_trait::async_trait;
    use snaxel_domain::{FailureKind, ResultItem};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone)]
    enum Behavior {
        Items(usize),
        Fail(&'static str),
        Delayed(Duration, usize),
        Hang,
        Panic,
    }

    struct MockProvider {
        behaviors: HashMap<Source, Behavior>,
        calls: AtomicUsize,
        seen: Mutex<Vec<(Source, usize)>>,
    }

    impl MockProvider {
        fn new() -> Self {
            Self {
                behaviors: HashMap::new(),
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn with(mut self, source: Source, behavior: Behavior) -> Self {
            self.behaviors.insert(source, behavior);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn limit_for(&self, source: Source) -> Option<usize> {
            self.seen
                .lock()
                .unwrap()
                .iter()
                .find(|(s, _)| *s == source)
                .map(|(_, l)| *l)
        }
    }

    fn items(source: Source, n: usize) -> Vec<ResultItem> {
        (0..n)
            .map(|i| {
                ResultItem::new(
                    format!("{} #{}", source, i),
                    format!("https://{}.example/{}", source, i),
                )
            })
            .collect()
    }

    #[async_trait]
    impl SourceProvider for MockProvider {
        async fn lookup(
            &self,
            source: Source,
            _query: &str,
            options: &LookupOptions,
        ) -> Result<Vec<ResultItem>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push((source, options.limit));

            match self.behaviors.get(&source).cloned().unwrap_or(Behavior::Items(3)) {
                Behavior::Items(n) => Ok(items(source, n)),
                Behavior::Fail(msg) => Err(ProviderError::RequestFailed(msg.to_string())),
                Behavior::Delayed(delay, n) => {
                    tokio::time::sleep(delay).await;
                    Ok(items(source, n))
                }
                Behavior::Hang => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
                Behavior::Panic => panic!("provider exploded"),
            }
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<(&'static str, serde_json::Value)>>,
    }

    impl SearchLogger for RecordingLogger {
        fn log(&self, event: SearchEvent) {
            self.events
                .lock()
                .unwrap()
                .push((event.event_type, event.payload));
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        completed: Mutex<Vec<(Source, bool)>>,
        cache_hits: AtomicUsize,
        finished: AtomicUsize,
    }

    impl ProgressNotifier for RecordingProgress {
        fn on_search_start(&self, _query: &str, _sources: &SourceSet) {}

        fn on_source_complete(&self, source: Source, success: bool) {
            self.completed.lock().unwrap().push((source, success));
        }

        fn on_search_complete(&self, _envelope: &Envelope) {
            self.finished.fetch_add(1, Ordering::SeqCst);
        }

        fn on_cache_hit(&self, _query: &str) {
            self.cache_hits.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn use_case(provider: MockProvider) -> (RunSearchUseCase<MockProvider>, Arc<MockProvider>) {
        let provider = Arc::new(provider);
        let cache = Arc::new(ResultCache::new(CacheConfig::default()));
        (RunSearchUseCase::new(provider.clone(), cache), provider)
    }

    #[tokio::test]
    async fn test_one_result_per_requested_source() {
        let (uc, _) = use_case(MockProvider::new());
        let envelope = uc
            .execute(SearchInput::new("cats").with_sources(["news", "web", "books"]))
            .await
            .unwrap();

        let keys: Vec<Source> = envelope.sources.keys().copied().collect();
        assert_eq!(keys, vec![Source::Web, Source::News, Source::Books]);
        assert_eq!(envelope.query, "cats");
    }

    #[tokio::test]
    async fn test_failure_does_not_drop_other_sources() {
        let provider = MockProvider::new()
            .with(Source::Web, Behavior::Fail("HTTP 503"))
            .with(Source::Images, Behavior::Items(7));
        let (uc, _) = use_case(provider);

        let envelope = uc
            .execute(SearchInput::new("cats").with_sources(["web", "images"]))
            .await
            .unwrap();

        let web = envelope.get(Source::Web).unwrap();
        assert_eq!(web.failure().unwrap().kind, FailureKind::Provider);
        assert!(web.failure().unwrap().message.contains("HTTP 503"));

        let images = envelope.get(Source::Images).unwrap();
        assert_eq!(images.results().unwrap(), items(Source::Images, 7).as_slice());
        assert_eq!(envelope.total_results, 7);
    }

    #[tokio::test]
    async fn test_total_counts_only_successes() {
        let provider = MockProvider::new()
            .with(Source::Web, Behavior::Items(4))
            .with(Source::Images, Behavior::Fail("nope"))
            .with(Source::Videos, Behavior::Items(0))
            .with(Source::News, Behavior::Items(2))
            .with(Source::Books, Behavior::Fail("nope"));
        let (uc, _) = use_case(provider);

        let output = uc.execute_all("cats", None).await.unwrap();
        let expected: usize = output.envelope.sources.values().map(SourceResult::count).sum();
        assert_eq!(output.envelope.total_results, expected);
        assert_eq!(output.envelope.total_results, 6);
    }

    #[tokio::test]
    async fn test_second_run_is_served_from_cache() {
        let (uc, provider) = use_case(MockProvider::new());
        let input = SearchInput::new("cats").with_sources(["web", "news"]);

        let first = uc.execute(input.clone()).await.unwrap();
        let second = uc.execute(input).await.unwrap();

        assert_eq!(provider.calls(), 2);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_cache_hit_ignores_source_order_and_case() {
        let (uc, provider) = use_case(MockProvider::new());

        uc.execute(SearchInput::new("cats").with_sources(["news", "web"]))
            .await
            .unwrap();
        uc.execute(SearchInput::new("  CATS ").with_sources(["web", "news"]))
            .await
            .unwrap();

        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_expired_entry_triggers_fresh_dispatch() {
        let provider = Arc::new(MockProvider::new());
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(ResultCache::with_clock(
            CacheConfig::with_ttl(Duration::from_secs(300)),
            clock.clone(),
        ));
        let uc = RunSearchUseCase::new(provider.clone(), cache);

        uc.execute(SearchInput::new("cats")).await.unwrap();
        clock.advance(Duration::from_secs(299));
        uc.execute(SearchInput::new("cats")).await.unwrap();
        assert_eq!(provider.calls(), 1);

        clock.advance(Duration::from_secs(2));
        uc.execute(SearchInput::new("cats")).await.unwrap();
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_blank_query_rejected_without_dispatch() {
        let (uc, provider) = use_case(MockProvider::new());
        let err = uc.execute(SearchInput::new("   ")).await.unwrap_err();

        assert!(matches!(err, RunSearchError::InvalidQuery));
        assert!(err.is_bad_request());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_sources_are_ignored() {
        let (uc, provider) = use_case(MockProvider::new());

        let with_unknown = uc
            .execute(SearchInput::new("cats").with_sources(["web", "carrierpigeon"]))
            .await
            .unwrap();
        // Same key as the filtered set, so this is a cache hit
        let plain = uc
            .execute(SearchInput::new("cats").with_sources(["web"]))
            .await
            .unwrap();

        assert_eq!(with_unknown, plain);
        assert_eq!(provider.calls(), 1);
        assert_eq!(with_unknown.sources.len(), 1);
    }

    #[tokio::test]
    async fn test_only_unknown_sources_is_an_error() {
        let (uc, provider) = use_case(MockProvider::new());
        let err = uc
            .execute(SearchInput::new("cats").with_sources(["carrierpigeon"]))
            .await
            .unwrap_err();

        assert!(matches!(err, RunSearchError::NoSources));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_images_limit_is_doubled() {
        let (uc, provider) = use_case(MockProvider::new());
        uc.execute(SearchInput::new("cats").with_sources(["web", "images"]))
            .await
            .unwrap();

        assert_eq!(provider.limit_for(Source::Web), Some(10));
        assert_eq!(provider.limit_for(Source::Images), Some(20));
    }

    #[tokio::test]
    async fn test_explicit_options_override_policy() {
        let (uc, provider) = use_case(MockProvider::new());
        uc.execute(
            SearchInput::new("cats")
                .with_sources(["web", "videos"])
                .with_limit(5)
                .with_options(Source::Videos, LookupOptions::new(3).with_param("region", "eu")),
        )
        .await
        .unwrap();

        assert_eq!(provider.limit_for(Source::Web), Some(5));
        assert_eq!(provider.limit_for(Source::Videos), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_presentation_order_ignores_completion_order() {
        let provider = MockProvider::new()
            .with(Source::Web, Behavior::Delayed(Duration::from_secs(5), 1))
            .with(Source::Books, Behavior::Items(1));
        let (uc, _) = use_case(provider);
        let progress = RecordingProgress::default();

        let envelope = uc
            .execute_with_progress(
                SearchInput::new("cats").with_sources(["books", "web"]),
                &progress,
            )
            .await
            .unwrap();

        let completed: Vec<Source> = progress.completed.lock().unwrap().iter().map(|(s, _)| *s).collect();
        assert_eq!(completed, vec![Source::Books, Source::Web]);

        let keys: Vec<Source> = envelope.sources.keys().copied().collect();
        assert_eq!(keys, vec![Source::Web, Source::Books]);
        assert_eq!(progress.finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_source_times_out_alone() {
        let provider = MockProvider::new()
            .with(Source::Videos, Behavior::Hang)
            .with(Source::News, Behavior::Items(2));
        let (uc, _) = use_case(provider);
        let uc = uc.with_config(BehaviorConfig::with_timeout_seconds(5));

        let envelope = uc
            .execute(SearchInput::new("cats").with_sources(["videos", "news"]))
            .await
            .unwrap();

        let videos = envelope.get(Source::Videos).unwrap();
        assert_eq!(videos.failure().unwrap().kind, FailureKind::Timeout);
        assert_eq!(envelope.get(Source::News).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn test_panicking_source_is_isolated() {
        let provider = MockProvider::new()
            .with(Source::Books, Behavior::Panic)
            .with(Source::Web, Behavior::Items(1));
        let (uc, _) = use_case(provider);

        let envelope = uc
            .execute(SearchInput::new("cats").with_sources(["web", "books"]))
            .await
            .unwrap();

        let books = envelope.get(Source::Books).unwrap();
        assert_eq!(books.failure().unwrap().kind, FailureKind::Internal);
        assert_eq!(envelope.get(Source::Web).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_search_is_not_cached() {
        let provider = MockProvider::new().with(Source::Web, Behavior::Hang);
        let (uc, _) = use_case(provider);
        let uc = uc.with_config(BehaviorConfig::from_timeout_seconds(None));

        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let err = uc
            .execute(SearchInput::new("cats").with_cancellation(token))
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert!(!err.is_bad_request());
        assert_eq!(uc.cache().size(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_search_all_is_not_cached() {
        let provider = MockProvider::new().with(Source::Videos, Behavior::Hang);
        let (uc, provider) = use_case(provider);
        let uc = uc.with_config(BehaviorConfig::from_timeout_seconds(None));

        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let err = uc
            .execute_all_with_progress("cats", None, Some(token), &NoProgress)
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(provider.calls(), Source::ALL.len());
        assert_eq!(uc.cache().size(), 0);
    }

    #[tokio::test]
    async fn test_execute_all_summary() {
        let provider = MockProvider::new()
            .with(Source::News, Behavior::Fail("rate limited"))
            .with(Source::Books, Behavior::Items(1));
        let (uc, provider) = use_case(provider);

        let output = uc.execute_all("cats", Some(4)).await.unwrap();

        assert_eq!(provider.calls(), Source::ALL.len());
        assert_eq!(output.envelope.sources.len(), Source::ALL.len());
        assert_eq!(output.summary.failed_sources, 1);
        assert_eq!(output.summary.successful_sources, 4);
        assert_eq!(output.summary.count_for(Source::Books), Some(1));
        assert_eq!(output.summary.total_results, output.envelope.total_results);
        assert_eq!(provider.limit_for(Source::Images), Some(8));
    }

    #[tokio::test]
    async fn test_execute_single_bypasses_cache() {
        let (uc, provider) = use_case(MockProvider::new().with(Source::Images, Behavior::Items(2)));

        let first = uc.execute_single(Source::Images, "cats", None).await.unwrap();
        let second = uc.execute_single(Source::Images, "cats", None).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.calls(), 2);
        assert_eq!(provider.limit_for(Source::Images), Some(20));
        assert_eq!(uc.cache().size(), 0);
    }

    #[tokio::test]
    async fn test_execute_single_explicit_limit_is_not_doubled() {
        let (uc, provider) = use_case(MockProvider::new().with(Source::Images, Behavior::Items(2)));

        uc.execute_single(Source::Images, "cats", Some(5)).await.unwrap();

        assert_eq!(provider.limit_for(Source::Images), Some(5));
    }

    #[tokio::test]
    async fn test_execute_single_embeds_failure() {
        let (uc, _) = use_case(MockProvider::new().with(Source::News, Behavior::Fail("down")));
        let result = uc.execute_single(Source::News, "cats", Some(5)).await.unwrap();
        assert!(!result.is_success());

        let err = uc.execute_single(Source::News, "", Some(5)).await.unwrap_err();
        assert!(matches!(err, RunSearchError::InvalidQuery));
    }

    #[tokio::test]
    async fn test_fresh_envelopes_are_logged_once() {
        let (uc, _) = use_case(MockProvider::new().with(Source::Web, Behavior::Fail("down")));
        let logger = Arc::new(RecordingLogger::default());
        let uc = uc.with_logger(logger.clone());
        let progress = RecordingProgress::default();

        uc.execute_with_progress(SearchInput::new("cats"), &progress)
            .await
            .unwrap();
        uc.execute_with_progress(SearchInput::new("cats"), &progress)
            .await
            .unwrap();

        let events = logger.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "search_completed");
        assert_eq!(events[0].1["failed"][0], "web");
        assert_eq!(progress.cache_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unavailable_cache_fails_without_dispatch() {
        let (uc, provider) = use_case(MockProvider::new());
        uc.cache().poison();

        let err = uc
            .execute(SearchInput::new("cats").with_sources(["web", "news"]))
            .await
            .unwrap_err();

        assert!(matches!(err, RunSearchError::Infrastructure(_)));
        assert!(!err.is_bad_request());
        assert_eq!(provider.calls(), 0);
    }

    #[test]
    fn test_error_classification() {
        assert!(RunSearchError::NoSources.is_bad_request());
        assert!(!RunSearchError::Infrastructure("lock poisoned".into()).is_bad_request());

        let err: RunSearchError = CacheError::Unavailable("poisoned".into()).into();
        assert!(matches!(err, RunSearchError::Infrastructure(_)));
    }
}
