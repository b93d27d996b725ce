//! RSS feed source implementation.
//!
//! Fetches a feed over HTTP with [`reqwest`] and converts each entry into a
//! [`FeedItem`].  RSS (0.9x, 1.0, 2.0) is read with the [`rss`] crate; a
//! document whose root is not an RSS element is retried as Atom with
//! [`atom_syndication`].  Parsing is kept in pure functions
//! ([`RssSource::parse_feed`]) so tests can run it without the network.

use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::Client;

use super::{DataSource, FeedItem, FetchError};

static TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<[^>]*>").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// An RSS feed data source.
pub struct RssSource {
    client: Client,
    /// The feed URL to poll.
    pub url: String,
    /// A short label used in log lines.
    pub label: String,
}

impl RssSource {
    /// Create a new RSS source sharing the given HTTP client.
    pub fn new(client: Client, url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            label: label.into(),
        }
    }

    /// Parse a fetched document, RSS first, then Atom.
    pub fn parse_feed(body: &[u8]) -> Result<Vec<FeedItem>, FetchError> {
        match rss::Channel::read_from(body) {
            Ok(channel) => Ok(Self::parse_channel(&channel)),
            Err(rss_err @ rss::Error::InvalidStartTag) => match atom_syndication::Feed::read_from(body) {
                Ok(feed) => Ok(Self::parse_atom(&feed)),
                // Neither format recognised the root element.
                Err(atom_syndication::Error::InvalidStartTag) => Err(rss_err.into()),
                Err(atom_err) => Err(atom_err.into()),
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Parse an already-fetched [`rss::Channel`] into [`FeedItem`]s, keeping
    /// feed order.
    pub fn parse_channel(channel: &rss::Channel) -> Vec<FeedItem> {
        channel
            .items()
            .iter()
            .map(|item| FeedItem {
                title: item.title().map(String::from),
                link: item
                    .link()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from),
                summary: item
                    .description()
                    .and_then(snippet)
                    .or_else(|| item.content().and_then(snippet)),
                published: published_at(item),
            })
            .collect()
    }

    /// Parse an already-fetched Atom [`Feed`](atom_syndication::Feed),
    /// keeping feed order.
    pub fn parse_atom(feed: &atom_syndication::Feed) -> Vec<FeedItem> {
        feed.entries()
            .iter()
            .map(|entry| {
                let title = entry.title().value.trim();
                FeedItem {
                    title: (!title.is_empty()).then(|| title.to_string()),
                    link: atom_link(entry),
                    summary: entry
                        .summary()
                        .and_then(|s| snippet(&s.value))
                        .or_else(|| entry.content().and_then(|c| c.value()).and_then(snippet)),
                    published: entry
                        .published()
                        .or_else(|| Some(entry.updated()))
                        .filter(|d| d.timestamp() > 0)
                        .map(|d| d.with_timezone(&Utc)),
                }
            })
            .collect()
    }
}

#[async_trait]
impl DataSource for RssSource {
    fn name(&self) -> &str {
        &self.label
    }

    async fn fetch(&self) -> Result<Vec<FeedItem>, FetchError> {
        let resp = self.client.get(&self.url).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status()));
        }
        let body = resp.bytes().await?;
        Self::parse_feed(body.as_ref())
    }
}

/// The `alternate` link (Atom's default relation), else the first one.
fn atom_link(entry: &atom_syndication::Entry) -> Option<String> {
    let links = entry.links();
    links
        .iter()
        .find(|l| l.rel() == "alternate")
        .or_else(|| links.first())
        .map(|l| l.href().trim())
        .filter(|href| !href.is_empty())
        .map(String::from)
}

/// `<pubDate>` (RFC 2822, then RFC 3339), falling back to `<dc:date>`.
fn published_at(item: &rss::Item) -> Option<DateTime<Utc>> {
    let dc_date = item
        .dublin_core_ext()
        .and_then(|dc| dc.dates().first())
        .map(String::as_str);

    item.pub_date()
        .and_then(parse_date)
        .or_else(|| dc_date.and_then(parse_date))
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Plain-text snippet of an HTML fragment: tags stripped, entities decoded,
/// whitespace collapsed.  Empty results become `None`.
fn snippet(html: &str) -> Option<String> {
    let text = TAGS.replace_all(html, " ");
    let text = html_escape::decode_html_entities(&text);
    let text = WHITESPACE.replace_all(&text, " ");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
