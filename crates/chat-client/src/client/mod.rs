//! Client - the root context guilds and channels hang off
//!
//! The client owns the guild table and the network collaborator. Channels
//! reach the collaborator through a [`CommandLink`] to the client state, so
//! dropping the last client handle detaches every channel still held
//! elsewhere.

mod apply;

use async_trait::async_trait;
use chat_common::{ClientSettings, SdkConfig};
use chat_model::{
    resolve, ChannelCommands, ChannelId, CommandLink, Guild, GuildChannel, GuildId, MessageId,
    Permissions, RequestError, UserId, Webhook, WebhookOptions,
};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

use crate::pending::PendingChannels;
use crate::registry::GuildRegistry;

/// Cheaply cloneable handle to a client
#[derive(Clone)]
pub struct Client {
    state: Arc<ClientState>,
}

pub(crate) struct ClientState {
    registry: RwLock<GuildRegistry>,
    pending: Mutex<PendingChannels>,
    rest: Arc<dyn ChannelCommands>,
}

/// Counts describing the registry at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistrySummary {
    pub guilds: usize,
    pub unavailable_guilds: usize,
    pub channels: usize,
    pub pending_channels: usize,
    pub roles: usize,
    pub members: usize,
}

impl Client {
    /// Create a client with default settings
    pub fn new(rest: Arc<dyn ChannelCommands>) -> Self {
        Self::with_settings(rest, &ClientSettings::default())
    }

    pub fn with_settings(rest: Arc<dyn ChannelCommands>, settings: &ClientSettings) -> Self {
        Self {
            state: Arc::new(ClientState {
                registry: RwLock::new(GuildRegistry::new()),
                pending: Mutex::new(PendingChannels::new(settings.pending_channel_limit)),
                rest,
            }),
        }
    }

    pub fn from_config(config: &SdkConfig, rest: Arc<dyn ChannelCommands>) -> Self {
        Self::with_settings(rest, &config.client)
    }

    /// Link channels decoded by this client use
    pub fn command_link(&self) -> CommandLink {
        CommandLink::attach(&self.state)
    }

    /// Get a snapshot of a guild
    pub fn guild(&self, guild_id: GuildId) -> Option<Guild> {
        self.state.registry.read().guild(guild_id).cloned()
    }

    /// Run a closure against a guild without copying it
    pub fn with_guild<R>(&self, guild_id: GuildId, f: impl FnOnce(&Guild) -> R) -> Option<R> {
        self.state.registry.read().guild(guild_id).map(f)
    }

    /// Get a snapshot of a registered channel
    pub fn channel(&self, channel_id: ChannelId) -> Option<GuildChannel> {
        self.state.registry.read().channel(channel_id).cloned()
    }

    /// Get a channel still waiting for its guild
    pub fn pending_channel(&self, channel_id: ChannelId) -> Option<GuildChannel> {
        self.state.pending.lock().get(channel_id).cloned()
    }

    pub fn guild_count(&self) -> usize {
        self.state.registry.read().guild_count()
    }

    pub fn channel_count(&self) -> usize {
        self.state.registry.read().channel_count()
    }

    pub fn pending_count(&self) -> usize {
        self.state.pending.lock().len()
    }

    /// Effective permissions of a member in a registered channel
    ///
    /// `None` if the guild, the member, or the channel is unknown.
    pub fn channel_permissions(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> Option<Permissions> {
        let registry = self.state.registry.read();
        let guild = registry.guild(guild_id)?;
        let member = guild.member(user_id)?;
        let channel = guild.channel(channel_id)?;
        Some(resolve(member, channel, guild))
    }

    pub fn summary(&self) -> RegistrySummary {
        let registry = self.state.registry.read();
        let mut summary = RegistrySummary {
            guilds: registry.guild_count(),
            channels: registry.channel_count(),
            pending_channels: self.state.pending.lock().len(),
            ..RegistrySummary::default()
        };
        for guild in registry.guilds() {
            summary.roles += guild.role_count();
            summary.members += guild.member_count();
            if guild.unavailable {
                summary.unavailable_guilds += 1;
            }
        }
        summary
    }
}

#[async_trait]
impl ChannelCommands for ClientState {
    #[instrument(skip(self, options))]
    async fn create_webhook(
        &self,
        channel_id: ChannelId,
        options: WebhookOptions,
    ) -> Result<Webhook, RequestError> {
        self.rest.create_webhook(channel_id, options).await
    }

    #[instrument(skip(self))]
    async fn delete_reactions(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), RequestError> {
        self.rest.delete_reactions(channel_id, message_id).await
    }

    #[instrument(skip(self))]
    async fn get_webhooks(&self, channel_id: ChannelId) -> Result<Vec<Webhook>, RequestError> {
        self.rest.get_webhooks(channel_id).await
    }
}
