//! The item type shared by every feed source.
//!
//! `FeedItem` is produced fresh on each poll and never persisted.  Sources
//! convert their native entries into it so that the novelty filter and the
//! notifier stay format-agnostic.

use chrono::{DateTime, Utc};

/// A single feed entry, normalised from the source format.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct FeedItem {
    /// Human-readable headline.
    pub title: Option<String>,

    /// URL of the full content.
    ///
    /// This is the item's identity for novelty purposes.  Items without a
    /// link are never announced.
    pub link: Option<String>,

    /// Plain-text summary (HTML already stripped).
    pub summary: Option<String>,

    /// Publication timestamp, if the feed provided a parseable one.
    pub published: Option<DateTime<Utc>>,
}

impl FeedItem {
    /// Convenience constructor for an item that only carries a link and a title.
    pub fn new(link: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            link: Some(link.into()),
            ..Self::default()
        }
    }

    /// The link, if present and not blank.
    pub fn usable_link(&self) -> Option<&str> {
        self.link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
    }
}
