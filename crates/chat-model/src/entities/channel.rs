//! Channel entity - a guild-scoped text, voice, category, news, or store channel

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

use super::wire;
use super::{PermissionOverwrites, Webhook, WebhookOptions};
use crate::error::{CommandError, CommandResult, DecodeError, DecodeResult};
use crate::traits::{ChannelCommands, CommandLink, OwnerContext};
use crate::value_objects::{ChannelId, GuildId, MessageId};

/// Channel type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelKind {
    /// Guild text channel
    #[default]
    GuildText,
    /// Direct message between users
    Dm,
    GuildVoice,
    GroupDm,
    /// Guild category for organizing channels
    GuildCategory,
    GuildNews,
    GuildStore,
    /// A type this model does not know yet, kept as received
    Unknown(u8),
}

impl ChannelKind {
    /// Get the numeric value
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::GuildText => 0,
            Self::Dm => 1,
            Self::GuildVoice => 2,
            Self::GroupDm => 3,
            Self::GuildCategory => 4,
            Self::GuildNews => 5,
            Self::GuildStore => 6,
            Self::Unknown(value) => value,
        }
    }

    /// Decode the wire `type` field, an integer in `0..=255`
    pub fn decode(value: &Value) -> DecodeResult<Self> {
        value
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .map(Self::from)
            .ok_or(DecodeError::invalid("type", "integer 0-255"))
    }
}

impl From<u8> for ChannelKind {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::GuildText,
            1 => Self::Dm,
            2 => Self::GuildVoice,
            3 => Self::GroupDm,
            4 => Self::GuildCategory,
            5 => Self::GuildNews,
            6 => Self::GuildStore,
            other => Self::Unknown(other),
        }
    }
}

impl From<ChannelKind> for u8 {
    fn from(kind: ChannelKind) -> Self {
        kind.as_u8()
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GuildText => f.write_str("text"),
            Self::Dm => f.write_str("dm"),
            Self::GuildVoice => f.write_str("voice"),
            Self::GroupDm => f.write_str("group dm"),
            Self::GuildCategory => f.write_str("category"),
            Self::GuildNews => f.write_str("news"),
            Self::GuildStore => f.write_str("store"),
            Self::Unknown(value) => write!(f, "unknown ({value})"),
        }
    }
}

/// Guild channel entity
///
/// Decoded from a channel payload and then treated as an immutable value,
/// except for the overwrite set which a permission update replaces wholesale.
/// The guild and the client are referenced, never owned.
#[derive(Debug, Clone)]
pub struct GuildChannel {
    pub id: ChannelId,
    pub kind: ChannelKind,
    pub name: Option<String>,
    pub topic: Option<String>,
    pub bitrate: Option<u32>,
    pub user_limit: Option<u32>,
    pub position: Option<i32>,
    pub is_nsfw: bool,
    pub is_private: Option<bool>,
    pub last_message_id: Option<MessageId>,
    pub last_pin_timestamp: Option<DateTime<Utc>>,
    /// Category this channel sits under
    pub parent_id: Option<ChannelId>,
    overwrites: PermissionOverwrites,
    /// `guild_id` as received
    guild_id: Option<GuildId>,
    /// Set only while the owner knows `guild_id`
    guild: Option<GuildId>,
    link: CommandLink,
}

impl GuildChannel {
    /// Create an unlinked channel with no optional fields set
    #[must_use]
    pub fn new(id: ChannelId, kind: ChannelKind) -> Self {
        Self {
            id,
            kind,
            name: None,
            topic: None,
            bitrate: None,
            user_limit: None,
            position: None,
            is_nsfw: false,
            is_private: None,
            last_message_id: None,
            last_pin_timestamp: None,
            parent_id: None,
            overwrites: PermissionOverwrites::new(),
            guild_id: None,
            guild: None,
            link: CommandLink::detached(),
        }
    }

    /// Decode a channel payload against an owner context
    ///
    /// Fails only when `id` or `type` is missing or malformed. An unknown
    /// guild leaves the guild link empty; see [`GuildChannel::relink`].
    pub fn decode<C>(payload: &Value, owner: &C) -> DecodeResult<Self>
    where
        C: OwnerContext + ?Sized,
    {
        Self::decode_in(payload, owner, None)
    }

    /// Decode a channel nested in a guild payload
    ///
    /// `default_guild` is the enclosing guild; it takes precedence over any
    /// `guild_id` the entry carries.
    pub(crate) fn decode_in<C>(
        payload: &Value,
        owner: &C,
        default_guild: Option<GuildId>,
    ) -> DecodeResult<Self>
    where
        C: OwnerContext + ?Sized,
    {
        let obj = wire::object(payload)?;
        let id = wire::required_id(obj, "id")?;
        let kind = ChannelKind::decode(wire::required(obj, "type")?)?;

        let name = wire::optional_str(obj, "name");
        let is_nsfw = wire::optional_bool(obj, "nsfw")
            .unwrap_or_else(|| has_nsfw_name(name.as_deref()));
        let overwrites = wire::optional_array(obj, "permission_overwrites")
            .map(|list| PermissionOverwrites::decode_list(list))
            .unwrap_or_default();

        let claimed: Option<GuildId> = wire::optional_id(obj, "guild_id");
        let guild_id = match (default_guild, claimed) {
            (Some(enclosing), Some(claimed)) if claimed != enclosing => {
                warn!(
                    channel_id = %id,
                    guild_id = %enclosing,
                    claimed = %claimed,
                    "Nested channel names another guild, keeping the enclosing one"
                );
                Some(enclosing)
            }
            (Some(enclosing), _) => Some(enclosing),
            (None, claimed) => claimed,
        };
        let guild = guild_id.filter(|g| owner.has_guild(*g));

        Ok(Self {
            id,
            kind,
            name,
            topic: wire::optional_str(obj, "topic"),
            bitrate: wire::optional_u32(obj, "bitrate"),
            user_limit: wire::optional_u32(obj, "user_limit"),
            position: wire::optional_i32(obj, "position"),
            is_nsfw,
            is_private: wire::optional_bool(obj, "is_private"),
            last_message_id: wire::optional_id(obj, "last_message_id"),
            last_pin_timestamp: wire::optional_timestamp(obj, "last_pin_timestamp"),
            parent_id: wire::optional_id(obj, "parent_id"),
            overwrites,
            guild_id,
            guild,
            link: owner.command_link(),
        })
    }

    /// Resolve the guild link again, once the owner may know the guild
    ///
    /// Also takes a fresh command link if the current one is dead.
    /// Returns whether the channel is now linked to its guild.
    pub fn relink<C>(&mut self, owner: &C) -> bool
    where
        C: OwnerContext + ?Sized,
    {
        self.guild = self.guild_id.filter(|g| owner.has_guild(*g));
        if !self.link.is_attached() {
            self.link = owner.command_link();
        }
        self.guild.is_some()
    }

    /// Set the guild this channel claims to belong to, without linking it
    #[must_use]
    pub fn in_guild(mut self, guild_id: GuildId) -> Self {
        self.guild_id = Some(guild_id);
        self
    }

    /// Return a copy carrying a different overwrite set
    #[must_use]
    pub fn with_overwrites(mut self, overwrites: PermissionOverwrites) -> Self {
        self.overwrites = overwrites;
        self
    }

    /// Replace the overwrite set in place
    pub fn set_overwrites(&mut self, overwrites: PermissionOverwrites) {
        self.overwrites = overwrites;
    }

    /// Use a different link to the client's commands
    #[must_use]
    pub fn with_link(mut self, link: CommandLink) -> Self {
        self.link = link;
        self
    }

    /// Guild id as received, whether or not it is linked
    #[inline]
    pub fn guild_id(&self) -> Option<GuildId> {
        self.guild_id
    }

    /// The linked guild, present only while the owner knows it
    #[inline]
    pub fn guild(&self) -> Option<GuildId> {
        self.guild
    }

    #[inline]
    pub fn is_linked(&self) -> bool {
        self.guild.is_some()
    }

    #[inline]
    pub fn overwrites(&self) -> &PermissionOverwrites {
        &self.overwrites
    }

    #[inline]
    pub fn command_link(&self) -> &CommandLink {
        &self.link
    }

    /// Check if this is a text-like channel (text or news)
    #[inline]
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, ChannelKind::GuildText | ChannelKind::GuildNews)
    }

    #[inline]
    #[must_use]
    pub fn is_voice(&self) -> bool {
        self.kind == ChannelKind::GuildVoice
    }

    /// Check if this is a category
    #[inline]
    #[must_use]
    pub fn is_category(&self) -> bool {
        self.kind == ChannelKind::GuildCategory
    }

    /// Get display name (channel name or the id)
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }

    /// Create a webhook in this channel
    pub fn create_webhook(
        &self,
        options: WebhookOptions,
    ) -> impl Future<Output = CommandResult<Webhook>> + Send + 'static {
        let dispatch = self.dispatcher("create_webhook");
        let channel_id = self.id;
        async move {
            let commands = dispatch?;
            Ok(commands.create_webhook(channel_id, options).await?)
        }
    }

    /// Delete every reaction on a message in this channel
    pub fn delete_reactions(
        &self,
        message_id: MessageId,
    ) -> impl Future<Output = CommandResult<()>> + Send + 'static {
        let dispatch = self.dispatcher("delete_reactions");
        let channel_id = self.id;
        async move {
            let commands = dispatch?;
            Ok(commands.delete_reactions(channel_id, message_id).await?)
        }
    }

    /// List the webhooks of this channel
    pub fn get_webhooks(&self) -> impl Future<Output = CommandResult<Vec<Webhook>>> + Send + 'static {
        let dispatch = self.dispatcher("get_webhooks");
        let channel_id = self.id;
        async move {
            let commands = dispatch?;
            Ok(commands.get_webhooks(channel_id).await?)
        }
    }

    // Resolved eagerly so the returned future outlives the channel
    fn dispatcher(&self, operation: &'static str) -> CommandResult<Arc<dyn ChannelCommands>> {
        if self.is_voice() {
            debug!(channel_id = %self.id, operation, "Command not dispatched for voice channel");
            return Err(CommandError::Unsupported {
                kind: self.kind,
                operation,
            });
        }

        let commands = self.link.upgrade().ok_or(CommandError::Detached)?;
        debug!(channel_id = %self.id, operation, "Dispatching channel command");
        Ok(commands)
    }
}

/// Older payloads omit `nsfw`; the name decides then
fn has_nsfw_name(name: Option<&str>) -> bool {
    name.is_some_and(|n| n == "nsfw" || n.starts_with("nsfw-"))
}
