//! Time-bounded feed cache keyed by source URL.
//!
//! Entries expire lazily: nothing sweeps the map in the background, an
//! expired entry is simply treated as absent by the next read and physically
//! replaced by the next successful store. Under many distinct keys the map
//! therefore grows with the key set; bounding that growth (or sweeping
//! proactively) is left to the caller via [`FeedCache::remove`] and
//! [`FeedCache::clear`].

use crate::error::FeedError;
use crate::models::Feed;
use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// One stored feed with its creation instant and time-to-live.
#[derive(Debug)]
struct CacheEntry {
    feed: Arc<Feed>,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn new(feed: Arc<Feed>, ttl: Duration) -> Self {
        Self {
            feed,
            stored_at: Instant::now(),
            ttl,
        }
    }

    /// An entry is servable while `now - stored_at <= ttl`, measured on the
    /// monotonic clock.
    fn is_fresh(&self) -> bool {
        self.stored_at.elapsed() <= self.ttl
    }
}

/// Concurrency-safe TTL cache mapping feed URLs to parsed feeds.
///
/// Values are handed out as `Arc<Feed>`, so a cache hit returns the same
/// allocation the first load produced. Safe for concurrent use from any
/// number of callers; see [`FeedCache::get_or_load`] for the one documented
/// relaxation under concurrent misses.
#[derive(Debug)]
pub struct FeedCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl FeedCache {
    /// Creates an empty cache whose entries live for `ttl` after each store.
    /// A zero `ttl` disables caching: every lookup loads and nothing is
    /// stored.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Returns the cached feed for `url`, or runs `loader` to produce one.
    ///
    /// A fresh entry is returned without invoking the loader. An absent or
    /// expired entry invokes the loader from the calling task; on success
    /// the result is stored with the current instant and returned, on
    /// failure nothing is stored (a stale entry, if one existed, stays in
    /// place) and the error is propagated.
    ///
    /// Two callers that miss on the same key at the same instant will both
    /// invoke the loader; the last successful store wins. The pipeline
    /// accepts this duplicate-fetch race rather than serializing loads per
    /// key.
    pub async fn get_or_load<F, Fut>(&self, url: &str, loader: F) -> Result<Arc<Feed>, FeedError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Feed, FeedError>>,
    {
        if self.ttl.is_zero() {
            tracing::debug!(url = %url, "caching disabled, loading feed");
            return loader().await.map(Arc::new);
        }

        // The map guard must not be held across the loader await below.
        if let Some(entry) = self.entries.get(url) {
            if entry.is_fresh() {
                tracing::debug!(url = %url, "cache hit");
                return Ok(Arc::clone(&entry.feed));
            }
            tracing::debug!(url = %url, "cache entry expired");
        }

        let feed = Arc::new(loader().await?);
        self.entries.insert(
            url.to_string(),
            CacheEntry::new(Arc::clone(&feed), self.ttl),
        );
        Ok(feed)
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Removes the entry for `url` if present; removing an absent key is a
    /// no-op.
    pub fn remove(&self, url: &str) {
        self.entries.remove(url);
    }

    /// Number of entries currently stored. Counts storage occupancy:
    /// logically expired entries that no read has replaced yet are included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::advance;

    const TTL: Duration = Duration::from_secs(300);

    fn test_feed(marker: &str) -> Feed {
        Feed {
            title: marker.to_string(),
            link: format!("https://example.com/{marker}"),
            description: "test feed".to_string(),
            items: Vec::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_access_loads_and_second_hits_without_loading() {
        let cache = FeedCache::new(TTL);
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_load("https://example.com/rss", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(test_feed("a")) }
            })
            .await
            .unwrap();
        let second = cache
            .get_or_load("https://example.com/rss", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(test_feed("a")) }
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn entry_at_exact_ttl_boundary_is_still_fresh() {
        let cache = FeedCache::new(TTL);
        let calls = AtomicUsize::new(0);
        let load = || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(test_feed("a")) }
        };

        cache.get_or_load("k", load).await.unwrap();
        advance(TTL).await;
        cache.get_or_load("k", load).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        advance(Duration::from_millis(1)).await;
        cache.get_or_load("k", load).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entry_is_reloaded_and_replaced() {
        let cache = FeedCache::new(TTL);

        let first = cache
            .get_or_load("k", || async { Ok(test_feed("old")) })
            .await
            .unwrap();
        advance(TTL + Duration::from_secs(1)).await;
        let second = cache
            .get_or_load("k", || async { Ok(test_feed("new")) })
            .await
            .unwrap();

        assert_eq!(first.title, "old");
        assert_eq!(second.title, "new");
        assert_eq!(cache.len(), 1);

        // The replacement is what later hits observe.
        let third = cache
            .get_or_load("k", || async { Ok(test_feed("unused")) })
            .await
            .unwrap();
        assert!(Arc::ptr_eq(&second, &third));
    }

    #[tokio::test(start_paused = true)]
    async fn loader_failure_propagates_and_caches_nothing() {
        let cache = FeedCache::new(TTL);
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let result = cache
                .get_or_load("k", || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Err::<Feed, _>(FeedError::HttpStatus(500)) }
                })
                .await;
            assert!(matches!(result, Err(FeedError::HttpStatus(500))));
        }

        // No negative caching: both calls reached the loader.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_reload_after_expiry_keeps_stale_entry_stored() {
        let cache = FeedCache::new(TTL);

        cache
            .get_or_load("k", || async { Ok(test_feed("stale")) })
            .await
            .unwrap();
        advance(TTL + Duration::from_secs(1)).await;

        let result = cache
            .get_or_load("k", || async {
                Err::<Feed, _>(FeedError::HttpStatus(503))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entries_still_count_toward_len() {
        let cache = FeedCache::new(TTL);
        cache
            .get_or_load("k", || async { Ok(test_feed("a")) })
            .await
            .unwrap();

        advance(TTL + Duration::from_secs(60)).await;
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_ttl_disables_caching() {
        let cache = FeedCache::new(Duration::ZERO);
        let calls = AtomicUsize::new(0);
        let load = || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(test_feed("a")) }
        };

        cache.get_or_load("k", load).await.unwrap();
        cache.get_or_load("k", load).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn remove_evicts_and_forces_reload() {
        let cache = FeedCache::new(TTL);
        let calls = AtomicUsize::new(0);
        let load = || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(test_feed("a")) }
        };

        cache.get_or_load("k", load).await.unwrap();
        cache.remove("k");
        assert_eq!(cache.len(), 0);

        cache.get_or_load("k", load).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn removing_an_absent_key_is_a_noop() {
        let cache = FeedCache::new(TTL);
        cache
            .get_or_load("k", || async { Ok(test_feed("a")) })
            .await
            .unwrap();

        cache.remove("never-stored");
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_empties_the_cache() {
        let cache = FeedCache::new(TTL);
        for key in ["a", "b", "c"] {
            cache
                .get_or_load(key, || async { Ok(test_feed(key)) })
                .await
                .unwrap();
        }
        assert_eq!(cache.len(), 3);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn distinct_keys_load_independently() {
        let cache = FeedCache::new(TTL);
        let calls = AtomicUsize::new(0);

        for key in ["a", "b"] {
            cache
                .get_or_load(key, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok(test_feed(key)) }
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }
}
