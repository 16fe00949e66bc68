//! Pipeline configuration.
//!
//! `Feed4jConfig` is a plain value: build it with the chainable `with_*`
//! setters, hand it to [`Feed4j::new`](crate::Feed4j::new), and it is frozen
//! for the lifetime of that instance. Every setter clamps its input to a
//! documented floor instead of rejecting it, so construction cannot fail.

use std::time::Duration;

/// Default User-Agent header sent with every feed request.
pub const DEFAULT_USER_AGENT: &str = "Feed4j/1.0";

/// Floor applied to both connect and read timeouts.
const MIN_TIMEOUT: Duration = Duration::from_secs(1);

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Immutable-after-construction settings for fetching, parsing, and caching.
///
/// ```
/// use feed4j::Feed4jConfig;
/// use std::time::Duration;
///
/// let config = Feed4jConfig::new()
///     .with_max_workers(4)
///     .with_connect_timeout(Duration::from_secs(5))
///     .with_cache_ttl(Duration::from_secs(60));
/// assert_eq!(config.max_workers(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Feed4jConfig {
    max_workers: usize,
    connect_timeout: Duration,
    read_timeout: Duration,
    user_agent: String,
    validate_xml: bool,
    cache_ttl: Duration,
}

impl Default for Feed4jConfig {
    fn default() -> Self {
        Self {
            max_workers: default_workers(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            validate_xml: false,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl Feed4jConfig {
    /// Creates a configuration with the defaults: worker count matching the
    /// machine's available parallelism, 10 s connect / 30 s read timeouts,
    /// the `Feed4j/1.0` User-Agent, lenient XML parsing, and a 5 minute
    /// cache TTL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the worker cap for the item parsing fan-out. Clamped to at
    /// least 1.
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    /// Sets the connection timeout. Clamped to at least 1 second.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout.max(MIN_TIMEOUT);
        self
    }

    /// Sets the read timeout applied to the response body. Clamped to at
    /// least 1 second.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout.max(MIN_TIMEOUT);
        self
    }

    /// Sets the User-Agent header. `None` or a blank string reverts to
    /// [`DEFAULT_USER_AGENT`].
    pub fn with_user_agent(mut self, user_agent: Option<&str>) -> Self {
        self.user_agent = match user_agent {
            Some(ua) if !ua.trim().is_empty() => ua.to_string(),
            _ => DEFAULT_USER_AGENT.to_string(),
        };
        self
    }

    /// Enables strict XML parsing: documents carrying a DTD are rejected
    /// instead of accepted-without-validation. Schema validation is never
    /// performed in either mode.
    pub fn with_validate_xml(mut self, validate_xml: bool) -> Self {
        self.validate_xml = validate_xml;
        self
    }

    /// Sets how long a cached feed stays servable. `Duration::ZERO`
    /// disables caching entirely: every read invokes the fetch pipeline and
    /// nothing is stored.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn validate_xml(&self) -> bool {
        self.validate_xml
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}
