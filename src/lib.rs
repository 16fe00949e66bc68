//! RSS fetch-parse-cache pipeline.
//!
//! `feed4j` reads an RSS feed over HTTP, parses it into a structured
//! [`Feed`], and memoizes the result per source URL for a bounded time
//! window, for callers that poll the same feeds repeatedly (aggregators,
//! readers, monitoring jobs):
//!
//! - **Fetch**: a configured HTTP client (timeouts, User-Agent) retrieves
//!   the document with a hard response-size cap.
//! - **Parse**: channel metadata is extracted from a read-only XML tree and
//!   items are parsed by a bounded worker fan-out that drops broken items
//!   instead of failing the feed.
//! - **Cache**: a TTL cache keyed by URL serves repeat reads without network
//!   traffic; failures are never cached, so the next read re-attempts.
//!
//! The [`Feed4j`] read path never surfaces an error: a failed fetch or parse
//! is logged and returned as `None`. The typed layers ([`FeedFetcher`],
//! [`FeedCache`]) stay public for callers that want the concrete
//! [`FeedError`].
//!
//! ```no_run
//! use feed4j::{Feed4j, Feed4jConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Feed4jConfig::new().with_cache_ttl(Duration::from_secs(60));
//!     let client = Feed4j::new(config).expect("HTTP client construction");
//!
//!     if let Some(feed) = client.read_feed("https://example.com/rss.xml").await {
//!         println!("{}: {} items", feed.title, feed.items.len());
//!         for item in &feed.items {
//!             println!("  {} ({})", item.title, item.link);
//!         }
//!     }
//! }
//! ```

mod cache;
mod client;
mod config;
mod datetime;
mod error;
mod fetcher;
pub mod models;
mod parser;

pub use cache::FeedCache;
pub use client::Feed4j;
pub use config::{Feed4jConfig, DEFAULT_USER_AGENT};
pub use error::FeedError;
pub use fetcher::FeedFetcher;
pub use models::{Feed, Item};

pub type Result<T> = std::result::Result<T, FeedError>;
