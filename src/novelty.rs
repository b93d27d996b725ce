//! Single-link novelty filter.
//!
//! Only the link of the last announced item is remembered.  There is no
//! backlog: if several items appear between two polls, only the newest one
//! is ever considered.

use crate::source::FeedItem;

/// The verdict for the newest item of a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Novelty {
    /// Unseen link; carries the link to announce.
    New(String),
    /// Same link as the last announcement.
    Seen,
    /// The item has no usable link and can never be announced.
    NoLink,
}

#[derive(Debug, Default)]
pub struct NoveltyFilter {
    last_announced: String,
}

impl NoveltyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link of the most recently recorded announcement, empty before the first.
    pub fn last_announced(&self) -> &str {
        &self.last_announced
    }

    pub fn check(&self, item: &FeedItem) -> Novelty {
        match item.usable_link() {
            None => Novelty::NoLink,
            Some(link) if link == self.last_announced => Novelty::Seen,
            Some(link) => Novelty::New(link.to_string()),
        }
    }

    pub fn is_new(&self, item: &FeedItem) -> bool {
        matches!(self.check(item), Novelty::New(_))
    }

    /// Record `link` as announced.
    ///
    /// Called *before* delivery is attempted, so a failed send is never
    /// retried: announcements are at-most-once.
    pub fn record_announced(&mut self, link: impl Into<String>) {
        self.last_announced = link.into();
    }

    /// Check `item` and, if new, record it in the same step.
    pub fn claim(&mut self, item: &FeedItem) -> Novelty {
        let verdict = self.check(item);
        if let Novelty::New(link) = &verdict {
            self.record_announced(link.clone());
        }
        verdict
    }
}
