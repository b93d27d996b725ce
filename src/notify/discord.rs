//! Discord REST implementation of [`MessagingClient`].

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::{Channel, ChannelKind, DeliveryError, MessagingClient, NotificationMessage};

pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Discord Bot API client
pub struct DiscordClient {
    client: Client,
    token: String,
    api_base: String,
}

/// The account the bot token belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct BotUser {
    pub username: String,
    #[serde(default)]
    pub discriminator: Option<String>,
}

impl BotUser {
    /// `name#1234`, or the bare username for accounts without a discriminator.
    pub fn tag(&self) -> String {
        match self.discriminator.as_deref() {
            Some(d) if d != "0" && !d.is_empty() => format!("{}#{}", self.username, d),
            _ => self.username.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChannelPayload {
    id: String,
    #[serde(rename = "type")]
    kind: u8,
}

impl DiscordClient {
    pub fn new(client: Client, token: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Check the token and return the bot account.
    pub async fn login(&self) -> Result<BotUser, DeliveryError> {
        let resp = self
            .client
            .get(format!("{}/users/@me", self.api_base))
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        Ok(check(resp).await?.json().await?)
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token)
    }
}

#[async_trait]
impl MessagingClient for DiscordClient {
    async fn resolve_channel(&self, id: &str) -> Result<Channel, DeliveryError> {
        let resp = self
            .client
            .get(format!("{}/channels/{}", self.api_base, id))
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(DeliveryError::ChannelNotFound(id.to_string()));
        }

        let payload: ChannelPayload = check(resp).await?.json().await?;
        Ok(Channel {
            id: payload.id,
            kind: channel_kind(payload.kind),
        })
    }

    async fn send(
        &self,
        channel: &Channel,
        message: &NotificationMessage,
    ) -> Result<(), DeliveryError> {
        let resp = self
            .client
            .post(format!("{}/channels/{}/messages", self.api_base, channel.id))
            .header("Authorization", self.auth_header())
            .json(&json!({ "embeds": [message] }))
            .send()
            .await?;

        check(resp).await?;
        Ok(())
    }
}

/// Map a Discord channel type to whether messages can be posted in it.
fn channel_kind(kind: u8) -> ChannelKind {
    match kind {
        // guild text, DM, guild voice, group DM, announcement,
        // announcement/public/private thread, stage voice
        0 | 1 | 2 | 3 | 5 | 10 | 11 | 12 | 13 => ChannelKind::Text,
        // category, directory, forum, media
        _ => ChannelKind::Other,
    }
}

/// Turn a non-success response into an error, logging platform-level faults.
async fn check(resp: Response) -> Result<Response, DeliveryError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = resp
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("?")
            .to_string();
        tracing::warn!("⚠️ Discord warning: rate limited, retry after {retry_after}s");
        return Err(DeliveryError::RateLimited);
    }

    let body = resp.text().await.unwrap_or_default();
    tracing::error!("❌ Discord error: {status} {body}");
    Err(DeliveryError::Api { status, body })
}
