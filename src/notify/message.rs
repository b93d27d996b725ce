use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::source::FeedItem;

pub const ACCENT_COLOR: u32 = 0xFF0000;
pub const FOOTER_TEXT: &str = "RSS Feed";
pub const UNTITLED: &str = "Untitled";
pub const NO_DESCRIPTION: &str = "No description";

// Discord rejects embeds above these lengths.
const MAX_TITLE_CHARS: usize = 256;
const MAX_DESCRIPTION_CHARS: usize = 4096;

/// Display form of a [`FeedItem`], serialised as a Discord embed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationMessage {
    pub color: u32,
    pub title: String,
    pub description: String,
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub footer: Footer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Footer {
    pub text: String,
}

impl NotificationMessage {
    /// Build the message for `item`, whose link was already validated.
    ///
    /// `now` is used when the item carries no publish date.
    pub fn from_item(item: &FeedItem, link: &str, now: DateTime<Utc>) -> Self {
        let title = item
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED);
        let description = item
            .summary
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(NO_DESCRIPTION);

        Self {
            color: ACCENT_COLOR,
            title: truncate(title, MAX_TITLE_CHARS),
            description: truncate(description, MAX_DESCRIPTION_CHARS),
            url: link.to_string(),
            timestamp: item.published.unwrap_or(now),
            footer: Footer {
                text: FOOTER_TEXT.to_string(),
            },
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn uses_item_fields() {
        let published = Utc.with_ymd_and_hms(2025, 6, 15, 8, 0, 0).unwrap();
        let item = FeedItem {
            title: Some("Release 1.0".into()),
            link: Some("https://x/1".into()),
            summary: Some("It shipped".into()),
            published: Some(published),
        };

        let msg = NotificationMessage::from_item(&item, "https://x/1", now());
        assert_eq!(msg.title, "Release 1.0");
        assert_eq!(msg.description, "It shipped");
        assert_eq!(msg.url, "https://x/1");
        assert_eq!(msg.timestamp, published);
        assert_eq!(msg.color, 0xFF0000);
        assert_eq!(msg.footer.text, "RSS Feed");
    }

    #[test]
    fn placeholders_for_missing_fields() {
        let item = FeedItem {
            link: Some("https://x/1".into()),
            title: Some("  ".into()),
            ..FeedItem::default()
        };

        let msg = NotificationMessage::from_item(&item, "https://x/1", now());
        assert_eq!(msg.title, UNTITLED);
        assert_eq!(msg.description, NO_DESCRIPTION);
        assert_eq!(msg.timestamp, now());
    }

    #[test]
    fn long_text_is_truncated() {
        let item = FeedItem {
            title: Some("é".repeat(300)),
            summary: Some("x".repeat(5000)),
            ..FeedItem::new("https://x/1", "")
        };

        let msg = NotificationMessage::from_item(&item, "https://x/1", now());
        assert_eq!(msg.title.chars().count(), 256);
        assert!(msg.title.ends_with('…'));
        assert_eq!(msg.description.chars().count(), 4096);
    }

    #[test]
    fn serialises_as_discord_embed() {
        let msg = NotificationMessage::from_item(&FeedItem::new("https://x/1", "A"), "https://x/1", now());
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "color": 16711680,
                "title": "A",
                "description": "No description",
                "url": "https://x/1",
                "timestamp": "2026-01-01T12:00:00Z",
                "footer": { "text": "RSS Feed" }
            })
        );
    }
}
