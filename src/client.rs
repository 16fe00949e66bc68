//! Public entry point wiring configuration, cache, and fetcher together.

use crate::cache::FeedCache;
use crate::config::Feed4jConfig;
use crate::fetcher::FeedFetcher;
use crate::models::Feed;
use std::sync::Arc;

/// The feed pipeline: a configured fetcher behind a per-instance TTL cache.
///
/// Every instance owns its own cache and HTTP client; nothing is shared
/// process-wide. Cheap to share behind an `Arc` across tasks, since all
/// operations take `&self`.
#[derive(Debug)]
pub struct Feed4j {
    config: Feed4jConfig,
    fetcher: FeedFetcher,
    cache: FeedCache,
}

impl Feed4j {
    /// Builds the pipeline from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Client`](crate::FeedError::Client) when the HTTP
    /// client cannot be constructed; every later failure mode is handled
    /// inside [`read_feed`](Self::read_feed).
    pub fn new(config: Feed4jConfig) -> crate::Result<Self> {
        let fetcher = FeedFetcher::new(&config)?;
        let cache = FeedCache::new(config.cache_ttl());
        Ok(Self {
            config,
            fetcher,
            cache,
        })
    }

    /// Reads the feed at `url`, serving it from the cache when a stored copy
    /// is still within its time-to-live.
    ///
    /// This path never returns an error: any failure (bad URL, network,
    /// HTTP status, malformed document, missing channel fields) is logged
    /// at `warn` and collapses to `None`, and nothing is cached, so the next
    /// call re-attempts the fetch. Callers that need the failure kind can
    /// drive [`FeedFetcher`] and [`FeedCache`] directly.
    ///
    /// Item order within the returned feed follows document order when the
    /// configured worker cap (or the item count) is 1; with more workers the
    /// order is unspecified.
    pub async fn read_feed(&self, url: &str) -> Option<Arc<Feed>> {
        match self
            .cache
            .get_or_load(url, || self.fetcher.fetch(url))
            .await
        {
            Ok(feed) => Some(feed),
            Err(error) => {
                tracing::warn!(url = %url, error = %error, "failed to read feed");
                None
            }
        }
    }

    /// Empties the feed cache.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Evicts one URL from the cache; absent URLs are a no-op.
    pub fn remove_from_cache(&self, url: &str) {
        self.cache.remove(url);
    }

    /// Number of cached entries, counting storage occupancy (expired entries
    /// a read has not yet replaced are included).
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    /// Read-only view of the configuration this instance was built with.
    pub fn config(&self) -> &Feed4jConfig {
        &self.config
    }
}
