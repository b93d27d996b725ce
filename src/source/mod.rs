//! Feed source abstraction layer.
//!
//! This module defines the [`DataSource`] trait, the common [`FeedItem`]
//! type, and [`FetchError`].  The concrete implementation lives in the
//! [`rss`] sub-module and reads both RSS and Atom documents.
//!
//! ## Ordering precondition
//!
//! Sources return items in **feed order**, and feeds are expected to list
//! their newest entry first.  Nothing here re-sorts: the poller treats the
//! first item as the newest one, so a feed that lists oldest-first will be
//! announced incorrectly.

mod feed_item;
mod rss;

pub use feed_item::FeedItem;
pub use rss::RssSource;

use async_trait::async_trait;
use thiserror::Error;

/// Why a feed could not be fetched or parsed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network or transport failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("status code {0}")]
    Status(reqwest::StatusCode),

    /// The body is neither RSS nor Atom.
    #[error("invalid feed: {0}")]
    Parse(#[from] ::rss::Error),

    /// The body has an Atom root element but is not a valid Atom document.
    #[error("invalid Atom feed: {0}")]
    Atom(#[from] atom_syndication::Error),
}

/// Trait that every feed source must implement.
///
/// The poller calls [`fetch()`](DataSource::fetch) from spawned tasks, so
/// implementations must be [`Send`] + [`Sync`].
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Human-readable label used in log lines.
    fn name(&self) -> &str;

    /// Fetch the current items, in feed order.
    async fn fetch(&self) -> Result<Vec<FeedItem>, FetchError>;
}
