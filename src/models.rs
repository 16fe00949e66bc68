//! Parsed feed data containers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A parsed RSS channel.
///
/// Constructed once per successful fetch and never mutated afterwards; the
/// cache hands out `Arc<Feed>` so every reader observes the same snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    pub title: String,
    pub link: String,
    pub description: String,
    /// Parsed entries. Sequential parsing preserves document order; when the
    /// item fan-out runs multiple workers the order is unspecified (see
    /// [`Feed4j::read_feed`](crate::Feed4j::read_feed)).
    pub items: Vec<Item>,
}

/// One entry within a feed.
///
/// String fields may be empty when the source element is present but blank.
/// Items hold no reference back to their parent feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    pub link: String,
    pub description: String,
    /// Publication time in UTC; `None` when the feed supplied a date string
    /// no supported format could parse.
    pub pub_date: Option<DateTime<Utc>>,
}
