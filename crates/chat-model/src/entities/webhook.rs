//! Webhook entity and creation options

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::value_objects::{ChannelId, GuildId, UserId, WebhookId};

/// Webhook as returned by the REST layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    pub id: WebhookId,
    pub channel_id: ChannelId,
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    /// Creator, when the caller may see it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

impl Webhook {
    /// Execution URL path, when the token is known
    pub fn execute_path(&self) -> Option<String> {
        self.token
            .as_ref()
            .map(|token| format!("/webhooks/{}/{}", self.id, token))
    }
}

/// Options for creating a webhook
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebhookOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Avatar image data URI (`data:<mime>;base64,<data>`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl WebhookOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Use an avatar that is already base64 encoded
    #[must_use]
    pub fn avatar_base64(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Encode raw image bytes as the avatar
    #[must_use]
    pub fn avatar_image(mut self, mime: &str, bytes: &[u8]) -> Self {
        self.avatar = Some(format!("data:{mime};base64,{}", STANDARD.encode(bytes)));
        self
    }
}
