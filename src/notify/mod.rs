//! Delivery of new items to the chat channel.
//!
//! [`MessagingClient`] is the seam towards the chat platform (channel
//! resolution and message send).  [`Notifier`] formats a [`FeedItem`] and
//! pushes it through that client.  Failures are returned to the caller,
//! which logs them; nothing here retries.

pub mod discord;
mod message;

pub use discord::DiscordClient;
pub use message::{Footer, NotificationMessage};

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

use crate::source::FeedItem;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("channel {0} not found")]
    ChannelNotFound(String),

    #[error("channel {0} is not a text channel")]
    NotTextChannel(String),

    #[error("rate limited by the messaging API")]
    RateLimited,

    #[error("messaging API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Kind of a resolved channel, as far as delivery cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Text,
    Other,
}

/// A resolved destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub kind: ChannelKind,
}

impl Channel {
    pub fn is_text_based(&self) -> bool {
        self.kind == ChannelKind::Text
    }
}

#[async_trait]
pub trait MessagingClient: Send + Sync {
    /// Look up a channel by id.
    async fn resolve_channel(&self, id: &str) -> Result<Channel, DeliveryError>;

    /// Post one message to a resolved channel.
    async fn send(
        &self,
        channel: &Channel,
        message: &NotificationMessage,
    ) -> Result<(), DeliveryError>;
}

/// Formats items and delivers them to one fixed channel.
pub struct Notifier {
    client: Arc<dyn MessagingClient>,
    channel_id: String,
}

impl Notifier {
    pub fn new(client: Arc<dyn MessagingClient>, channel_id: impl Into<String>) -> Self {
        Self {
            client,
            channel_id: channel_id.into(),
        }
    }

    /// Announce `item`, whose link has already been validated as `link`.
    pub async fn notify(&self, item: &FeedItem, link: &str) -> Result<(), DeliveryError> {
        let channel = self.client.resolve_channel(&self.channel_id).await?;
        if !channel.is_text_based() {
            return Err(DeliveryError::NotTextChannel(channel.id));
        }

        let message = NotificationMessage::from_item(item, link, Utc::now());
        self.client.send(&channel, &message).await
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeMessenger;
    use super::*;

    #[tokio::test]
    async fn sends_formatted_item() {
        let fake = Arc::new(FakeMessenger::text_channel());
        let notifier = Notifier::new(fake.clone(), "42");

        notifier
            .notify(&FeedItem::new("https://x/1", "A"), "https://x/1")
            .await
            .unwrap();

        let sent = fake.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, "A");
        assert_eq!(sent[0].url, "https://x/1");
    }

    #[tokio::test]
    async fn unknown_channel_fails() {
        let fake = Arc::new(FakeMessenger::default());
        let notifier = Notifier::new(fake.clone(), "42");

        let err = notifier
            .notify(&FeedItem::new("https://x/1", "A"), "https://x/1")
            .await
            .unwrap_err();

        assert!(matches!(err, DeliveryError::ChannelNotFound(id) if id == "42"));
        assert!(fake.sent_titles().is_empty());
    }

    #[tokio::test]
    async fn non_text_channel_fails() {
        let fake = Arc::new(FakeMessenger {
            channel_kind: Some(ChannelKind::Other),
            ..FakeMessenger::default()
        });
        let notifier = Notifier::new(fake.clone(), "42");

        let err = notifier
            .notify(&FeedItem::new("https://x/1", "A"), "https://x/1")
            .await
            .unwrap_err();

        assert!(matches!(err, DeliveryError::NotTextChannel(_)));
        assert!(fake.sent_titles().is_empty());
    }

    #[tokio::test]
    async fn send_failure_is_returned() {
        let fake = Arc::new(FakeMessenger {
            fail_sends: true,
            ..FakeMessenger::text_channel()
        });
        let notifier = Notifier::new(fake, "42");

        let result = notifier
            .notify(&FeedItem::new("https://x/1", "A"), "https://x/1")
            .await;

        assert!(matches!(result, Err(DeliveryError::RateLimited)));
    }
}
