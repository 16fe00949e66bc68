//! HTTP retrieval of feed documents.
//!
//! One fetcher instance wraps a configured `reqwest::Client` (connect/read
//! timeouts and User-Agent come from [`Feed4jConfig`]) and turns a feed URL
//! into a parsed [`Feed`]. A fetch is a single attempt: transient failures
//! surface immediately and the cache layer re-attempts on the next read.

use crate::config::Feed4jConfig;
use crate::error::FeedError;
use crate::models::Feed;
use crate::parser::{self, ParseOptions};
use futures::StreamExt;
use url::Url;

const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Fetches and parses feeds over HTTP.
#[derive(Debug)]
pub struct FeedFetcher {
    client: reqwest::Client,
    options: ParseOptions,
}

impl FeedFetcher {
    /// Builds a fetcher from the pipeline configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Client`] when the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: &Feed4jConfig) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .user_agent(config.user_agent())
            .build()
            .map_err(FeedError::Client)?;

        Ok(Self {
            client,
            options: ParseOptions {
                strict_xml: config.validate_xml(),
                max_workers: config.max_workers(),
            },
        })
    }

    /// Fetches `url` and parses the body into a [`Feed`].
    ///
    /// The URL must be parseable and use http/https; the response must have
    /// a 2xx status and a body within the 10MB limit. The connection is
    /// released on every exit path: the response and its byte stream are
    /// dropped whether parsing succeeds or not.
    ///
    /// # Errors
    ///
    /// - [`FeedError::InvalidUrl`] / [`FeedError::UnsupportedScheme`] - URL
    ///   rejected before any I/O
    /// - [`FeedError::Network`] - Connection, TLS, or timeout failure
    /// - [`FeedError::HttpStatus`] - Non-2xx HTTP response
    /// - [`FeedError::ResponseTooLarge`] - Body exceeded the size limit
    /// - [`FeedError::Malformed`] / [`FeedError::MissingField`] - Document
    ///   failed to parse as a feed
    pub async fn fetch(&self, url: &str) -> Result<Feed, FeedError> {
        let url = feed_url(url)?;
        tracing::debug!(url = %url, "fetching feed");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::HttpStatus(status.as_u16()));
        }

        let bytes = read_limited_bytes(response, MAX_FEED_SIZE).await?;
        let text = String::from_utf8_lossy(&bytes);
        let feed = parser::parse_feed(&text, &self.options)?;

        tracing::debug!(url = %url, items = feed.items.len(), "feed parsed");
        Ok(feed)
    }
}

fn feed_url(raw: &str) -> Result<Url, FeedError> {
    let url = Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FeedError::UnsupportedScheme(other.to_string())),
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FeedError> {
    // Fast path: reject on the Content-Length header before reading
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FeedError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FeedError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
