//! TTL-bounded memo of aggregated envelopes.
//!
//! Entries expire lazily: a stale entry is evicted by the `get` that finds
//! it. [`ResultCache::cleanup`] and [`ResultCache::spawn_sweeper`] bound
//! memory for keys that are never read again.

use crate::ports::clock::{Clock, SystemClock};
use snaxel_domain::{Envelope, Query, SourceSet};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Default time-to-live for cached envelopes
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Errors raised by the cache itself
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Result cache unavailable: {0}")]
    Unavailable(String),
}

/// Cache settings, fixed at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttl: Duration,
    /// Upper bound on stored entries. `None` means TTL is the only limit.
    pub max_entries: Option<usize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            max_entries: None,
        }
    }
}

impl CacheConfig {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            ..Self::default()
        }
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }
}

/// Identity of a cached search: normalized query plus the source *set*
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    query: String,
    sources: SourceSet,
}

impl CacheKey {
    pub fn new(query: &Query, sources: &SourceSet) -> Self {
        Self {
            query: query.normalized().to_string(),
            sources: sources.clone(),
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.query, self.sources.cache_fragment())
    }
}

#[derive(Debug)]
struct CacheEntry {
    envelope: Arc<Envelope>,
    stored_at: Instant,
}

/// In-memory result cache shared by concurrent searches
pub struct ResultCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
}

impl ResultCache {
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            config,
            clock,
        }
    }

    pub fn key(query: &Query, sources: &SourceSet) -> CacheKey {
        CacheKey::new(query, sources)
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    /// Fresh envelope for this search, if any.
    ///
    /// An entry older than the TTL is removed and reported as absent.
    pub fn get(&self, query: &Query, sources: &SourceSet) -> Result<Option<Envelope>, CacheError> {
        let key = Self::key(query, sources);
        let now = self.clock.now();
        let mut entries = self.lock()?;

        let Some(entry) = entries.get(&key) else {
            trace!("cache miss for {}", key);
            return Ok(None);
        };

        if self.is_fresh(entry, now) {
            trace!("cache hit for {}", key);
            return Ok(Some(Envelope::clone(&entry.envelope)));
        }

        debug!("evicting stale cache entry {}", key);
        entries.remove(&key);
        Ok(None)
    }

    /// Store `envelope`, replacing any earlier entry for the same search.
    pub fn put(
        &self,
        query: &Query,
        sources: &SourceSet,
        envelope: Envelope,
    ) -> Result<(), CacheError> {
        let key = Self::key(query, sources);
        let now = self.clock.now();
        let mut entries = self.lock()?;

        if let Some(max) = self.config.max_entries
            && !entries.contains_key(&key)
            && entries.len() >= max
        {
            self.make_room(&mut entries, max, now);
        }

        entries.insert(
            key,
            CacheEntry {
                envelope: Arc::new(envelope),
                stored_at: now,
            },
        );
        Ok(())
    }

    /// Whether a fresh entry exists (evicts it if stale)
    pub fn contains(&self, query: &Query, sources: &SourceSet) -> Result<bool, CacheError> {
        Ok(self.get(query, sources)?.is_some())
    }

    /// Number of stored entries, stale ones included until swept.
    pub fn size(&self) -> usize {
        match self.entries.lock() {
            Ok(entries) => entries.len(),
            Err(poisoned) => poisoned.get_ref().len(),
        }
    }

    pub fn clear(&self) -> Result<(), CacheError> {
        self.lock()?.clear();
        Ok(())
    }

    /// Remove every expired entry. Returns how many were removed.
    pub fn cleanup(&self) -> Result<usize, CacheError> {
        let now = self.clock.now();
        let mut entries = self.lock()?;
        let before = entries.len();
        entries.retain(|_, entry| self.is_fresh(entry, now));
        let removed = before - entries.len();
        if removed > 0 {
            debug!("swept {} expired cache entries", removed);
        }
        Ok(removed)
    }

    /// Run [`ResultCache::cleanup`] every `interval` until `cancel` fires.
    pub fn spawn_sweeper(
        self: &Arc<Self>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = cache.cleanup() {
                            debug!("cache sweep skipped: {}", e);
                        }
                    }
                }
            }
            trace!("cache sweeper stopped");
        })
    }

    fn is_fresh(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.stored_at) <= self.config.ttl
    }

    /// Drop expired entries, then the oldest ones, until there is room for one more.
    fn make_room(&self, entries: &mut HashMap<CacheKey, CacheEntry>, max: usize, now: Instant) {
        entries.retain(|_, entry| self.is_fresh(entry, now));

        while entries.len() >= max {
            let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(key, _)| key.clone())
            else {
                break;
            };
            debug!("cache full, evicting {}", oldest);
            entries.remove(&oldest);
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<CacheKey, CacheEntry>>, CacheError> {
        self.entries
            .lock()
            .map_err(|e| CacheError::Unavailable(e.to_string()))
    }

    /// Poison the entry lock by panicking while holding it.
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        std::thread::scope(|scope| {
            let _ = scope
                .spawn(|| {
                    let _guard = self.entries.lock();
                    panic!("panicked while holding the cache lock");
                })
                .join();
        });
        assert!(self.entries.is_poisoned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::clock::ManualClock;
    use chrono::Utc;
    use snaxel_domain::{ResultItem, SourceResult, Source};
    use std::collections::BTreeMap;

    fn query(text: &str) -> Query {
        Query::parse(text).unwrap()
    }

    fn sources(ids: &[&str]) -> SourceSet {
        SourceSet::from_identifiers(ids).0
    }

    fn envelope(text: &str, n: usize) -> Envelope {
        let items = (0..n)
            .map(|i| ResultItem::new(format!("r{i}"), format!("https://example.com/{i}")))
            .collect();
        let mut map = BTreeMap::new();
        map.insert(Source::Web, SourceResult::Results(items));
        Envelope::assemble(text, Utc::now(), map)
    }

    fn cache_with_clock(ttl: Duration) -> (ResultCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = ResultCache::with_clock(CacheConfig::with_ttl(ttl), clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_put_then_get() {
        let (cache, _) = cache_with_clock(DEFAULT_TTL);
        let env = envelope("cats", 2);
        cache.put(&query("cats"), &sources(&["web"]), env.clone()).unwrap();

        let hit = cache.get(&query("cats"), &sources(&["web"])).unwrap();
        assert_eq!(hit, Some(env));
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_key_ignores_source_order_and_query_case() {
        let a = ResultCache::key(&query("Cats"), &sources(&["web", "news"]));
        let b = ResultCache::key(&query(" cats "), &sources(&["news", "web"]));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "cats-news,web");
    }

    #[test]
    fn test_different_source_sets_do_not_collide() {
        let (cache, _) = cache_with_clock(DEFAULT_TTL);
        cache.put(&query("cats"), &sources(&["web"]), envelope("cats", 1)).unwrap();
        assert!(cache.get(&query("cats"), &sources(&["web", "news"])).unwrap().is_none());
    }

    #[test]
    fn test_entry_valid_exactly_at_ttl() {
        let (cache, clock) = cache_with_clock(Duration::from_secs(60));
        cache.put(&query("cats"), &sources(&["web"]), envelope("cats", 1)).unwrap();

        clock.advance(Duration::from_secs(60));
        assert!(cache.contains(&query("cats"), &sources(&["web"])).unwrap());
    }

    #[test]
    fn test_stale_entry_is_evicted_on_get() {
        let (cache, clock) = cache_with_clock(Duration::from_secs(60));
        cache.put(&query("cats"), &sources(&["web"]), envelope("cats", 1)).unwrap();

        clock.advance(Duration::from_secs(61));
        assert!(cache.get(&query("cats"), &sources(&["web"])).unwrap().is_none());
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_later_put_supersedes() {
        let (cache, clock) = cache_with_clock(Duration::from_secs(60));
        cache.put(&query("cats"), &sources(&["web"]), envelope("cats", 1)).unwrap();
        clock.advance(Duration::from_secs(45));
        cache.put(&query("cats"), &sources(&["web"]), envelope("cats", 4)).unwrap();

        // Older than the first entry's TTL, but within the second's
        clock.advance(Duration::from_secs(30));
        let hit = cache.get(&query("cats"), &sources(&["web"])).unwrap().unwrap();
        assert_eq!(hit.total_results, 4);
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_cleanup_removes_only_stale() {
        let (cache, clock) = cache_with_clock(Duration::from_secs(60));
        cache.put(&query("old"), &sources(&["web"]), envelope("old", 1)).unwrap();
        clock.advance(Duration::from_secs(50));
        cache.put(&query("new"), &sources(&["web"]), envelope("new", 1)).unwrap();
        clock.advance(Duration::from_secs(20));

        assert_eq!(cache.size(), 2);
        assert_eq!(cache.cleanup().unwrap(), 1);
        assert_eq!(cache.size(), 1);
        assert!(cache.contains(&query("new"), &sources(&["web"])).unwrap());
    }

    #[test]
    fn test_clear() {
        let (cache, _) = cache_with_clock(DEFAULT_TTL);
        cache.put(&query("a"), &sources(&["web"]), envelope("a", 1)).unwrap();
        cache.put(&query("b"), &sources(&["web"]), envelope("b", 1)).unwrap();
        cache.clear().unwrap();
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_poisoned_lock_reports_unavailable() {
        let (cache, _) = cache_with_clock(DEFAULT_TTL);
        cache.put(&query("cats"), &sources(&["web"]), envelope("cats", 1)).unwrap();
        cache.poison();

        assert!(matches!(
            cache.get(&query("cats"), &sources(&["web"])),
            Err(CacheError::Unavailable(_))
        ));
        assert!(matches!(
            cache.put(&query("dogs"), &sources(&["web"]), envelope("dogs", 1)),
            Err(CacheError::Unavailable(_))
        ));
        assert!(matches!(cache.cleanup(), Err(CacheError::Unavailable(_))));
        assert!(matches!(cache.clear(), Err(CacheError::Unavailable(_))));
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_max_entries_evicts_oldest() {
        let clock = Arc::new(ManualClock::new());
        let cache = ResultCache::with_clock(
            CacheConfig::with_ttl(DEFAULT_TTL).with_max_entries(2),
            clock.clone(),
        );

        cache.put(&query("a"), &sources(&["web"]), envelope("a", 1)).unwrap();
        clock.advance(Duration::from_secs(1));
        cache.put(&query("b"), &sources(&["web"]), envelope("b", 1)).unwrap();
        clock.advance(Duration::from_secs(1));
        cache.put(&query("c"), &sources(&["web"]), envelope("c", 1)).unwrap();

        assert_eq!(cache.size(), 2);
        assert!(!cache.contains(&query("a"), &sources(&["web"])).unwrap());
        assert!(cache.contains(&query("b"), &sources(&["web"])).unwrap());
        assert!(cache.contains(&query("c"), &sources(&["web"])).unwrap());
    }

    #[test]
    fn test_max_entries_replacing_existing_key_does_not_evict() {
        let cache = ResultCache::new(CacheConfig::default().with_max_entries(2));
        cache.put(&query("a"), &sources(&["web"]), envelope("a", 1)).unwrap();
        cache.put(&query("b"), &sources(&["web"]), envelope("b", 1)).unwrap();
        cache.put(&query("a"), &sources(&["web"]), envelope("a", 3)).unwrap();

        assert_eq!(cache.size(), 2);
        assert!(cache.contains(&query("b"), &sources(&["web"])).unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_removes_expired_entries() {
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(ResultCache::with_clock(
            CacheConfig::with_ttl(Duration::from_secs(60)),
            clock.clone(),
        ));
        cache.put(&query("cats"), &sources(&["web"]), envelope("cats", 1)).unwrap();
        clock.advance(Duration::from_secs(120));

        let cancel = CancellationToken::new();
        let handle = cache.spawn_sweeper(Duration::from_secs(1), cancel.clone());
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(cache.size(), 0);
        cancel.cancel();
        handle.await.unwrap();
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(ResultCache::new(CacheConfig::default()));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    let q = query(&format!("q{}", i % 4));
                    let s = sources(&["web"]);
                    cache.put(&q, &s, envelope(q.text(), i)).unwrap();
                    cache.get(&q, &s).unwrap().is_some()
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(cache.size(), 4);
    }
}
