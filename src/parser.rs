//! Channel and item extraction from a parsed XML tree.
//!
//! The document is parsed once into a read-only DOM; channel metadata is
//! read in the calling thread and the `<item>` elements are handed to a
//! fan-out that parses them either sequentially or on a scoped batch of
//! worker threads. A broken item never fails the feed: it is logged and
//! dropped, and the rest of the batch is kept.

use crate::datetime;
use crate::error::FeedError;
use crate::models::{Feed, Item};
use roxmltree::{Document, Node, ParsingOptions};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Parse-stage settings, derived from the configuration at client build time.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ParseOptions {
    /// Reject documents carrying a DTD instead of accepting them unvalidated.
    pub(crate) strict_xml: bool,
    /// Upper bound on concurrent item-parse workers.
    pub(crate) max_workers: usize,
}

/// Parses a full feed document: channel metadata plus all items.
///
/// The first `<channel>` element anywhere in the document is the feed;
/// its `title`, `link`, and `description` are required. Items are every
/// `<item>` descendant of that channel. Item parse failures are dropped
/// individually (see [`parse_items`]); channel-level failures abort the
/// whole parse.
pub(crate) fn parse_feed(text: &str, options: &ParseOptions) -> Result<Feed, FeedError> {
    let mut xml_options = ParsingOptions::default();
    xml_options.allow_dtd = !options.strict_xml;

    let document = Document::parse_with_options(text, xml_options)
        .map_err(|e| FeedError::Malformed(e.to_string()))?;

    let channel = first_descendant(document.root(), "channel")
        .ok_or(FeedError::MissingField("channel"))?;
    let title = required_text(channel, "title")?;
    let link = required_text(channel, "link")?;
    let description = required_text(channel, "description")?;

    let item_nodes: Vec<Node> = descendants_named(channel, "item").collect();
    let items = parse_items(&item_nodes, options.max_workers);

    Ok(Feed {
        title,
        link,
        description,
        items,
    })
}

/// Parses a batch of `<item>` elements with up to `max_workers` workers.
///
/// The effective worker count is `min(item_count, max_workers)`, floored at
/// one. A single effective worker parses sequentially and the output
/// preserves document order exactly. With more than one worker each
/// invocation runs an independent scoped batch: workers pull items off a
/// shared cursor and are all joined before this function returns, and the
/// output order is unspecified (completion order). Callers that need
/// document order under concurrency must resequence by their own key.
///
/// An item that fails to parse is logged and omitted; it never aborts the
/// batch.
pub(crate) fn parse_items(nodes: &[Node<'_, '_>], max_workers: usize) -> Vec<Item> {
    if nodes.is_empty() {
        return Vec::new();
    }

    let workers = nodes.len().min(max_workers.max(1));
    if workers <= 1 {
        return parse_items_sequential(nodes);
    }
    parse_items_parallel(nodes, workers)
}

fn parse_items_sequential(nodes: &[Node<'_, '_>]) -> Vec<Item> {
    nodes
        .iter()
        .enumerate()
        .filter_map(|(index, node)| match parse_item(*node) {
            Ok(item) => Some(item),
            Err(error) => {
                tracing::warn!(index = index, error = %error, "skipping unparsable item");
                None
            }
        })
        .collect()
}

fn parse_items_parallel(nodes: &[Node<'_, '_>], workers: usize) -> Vec<Item> {
    let cursor = AtomicUsize::new(0);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                scope.spawn(|| {
                    let mut parsed = Vec::new();
                    loop {
                        let index = cursor.fetch_add(1, Ordering::Relaxed);
                        let Some(node) = nodes.get(index) else {
                            break;
                        };
                        match parse_item(*node) {
                            Ok(item) => parsed.push(item),
                            Err(error) => {
                                tracing::warn!(index = index, error = %error, "skipping unparsable item");
                            }
                        }
                    }
                    parsed
                })
            })
            .collect();

        // Every worker is joined before the scope exits, so the batch can
        // never outlive the call.
        handles
            .into_iter()
            .flat_map(|handle| {
                handle.join().unwrap_or_else(|_| {
                    tracing::error!("item parse worker panicked");
                    Vec::new()
                })
            })
            .collect()
    })
}

/// Extracts one item's fields. Missing `title`, `link`, `description`, or
/// `pubDate` tags fail this item only; an unrecognized date string degrades
/// to `pub_date: None`. Reads only its own element, so disjoint items are
/// safe to parse concurrently.
pub(crate) fn parse_item(node: Node<'_, '_>) -> Result<Item, FeedError> {
    let title = required_text(node, "title")?;
    let link = required_text(node, "link")?;
    let description = required_text(node, "description")?;
    let raw_date = required_text(node, "pubDate")?;

    let pub_date = datetime::parse_pub_date(&raw_date);
    if pub_date.is_none() && !raw_date.trim().is_empty() {
        tracing::warn!(value = %raw_date.trim(), "unrecognized pubDate format, keeping item without timestamp");
    }

    Ok(Item {
        title,
        link,
        description,
        pub_date,
    })
}

/// Text of the first matching descendant, or `MissingField` when the tag is
/// absent. A present-but-empty element yields an empty string.
fn required_text(scope: Node<'_, '_>, tag: &'static str) -> Result<String, FeedError> {
    first_descendant(scope, tag)
        .map(text_content)
        .ok_or(FeedError::MissingField(tag))
}

fn first_descendant<'a, 'input>(
    scope: Node<'a, 'input>,
    tag: &'static str,
) -> Option<Node<'a, 'input>> {
    descendants_named(scope, tag).next()
}

fn descendants_named<'a, 'input>(
    scope: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    scope.descendants().filter(move |node| is_named(node, tag))
}

/// Matches un-namespaced elements by exact tag name, so `<media:title>`
/// never satisfies a lookup for `title`.
fn is_named(node: &Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && node.tag_name().namespace().is_none() && node.tag_name().name() == tag
}

/// Concatenated text of every text/CDATA node under `node`.
fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
