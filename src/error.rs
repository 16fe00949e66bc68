use thiserror::Error;

/// Errors that can occur while fetching and parsing a feed.
///
/// These cover the full pipeline: URL rejection, network issues, HTTP
/// errors, oversized responses, and XML/structure failures. An unparsable
/// `pubDate` is deliberately not represented here: it degrades to an absent
/// timestamp on the item instead of failing anything.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Feed URL could not be parsed at all
    #[error("invalid feed URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// Feed URL parsed but uses a scheme other than http/https
    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
    /// Network-level error (DNS, connection, TLS, timeout)
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the size limit
    #[error("response too large: exceeds {0} bytes")]
    ResponseTooLarge(usize),
    /// Document is not well-formed XML, or carries a DTD in strict mode
    #[error("malformed document: {0}")]
    Malformed(String),
    /// A required tag was absent on the channel or an item
    #[error("missing required <{0}> element")]
    MissingField(&'static str),
    /// HTTP client construction failed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
