//! Guild registry - the client's table of guilds and a channel index over them

use chat_model::{ChannelId, Guild, GuildChannel, GuildId};
use std::collections::HashMap;

/// Guilds by id, plus which guild each registered channel lives in
///
/// Channels are owned by their guild; the index only points into it.
#[derive(Debug, Default)]
pub(crate) struct GuildRegistry {
    guilds: HashMap<GuildId, Guild>,
    channel_index: HashMap<ChannelId, GuildId>,
}

impl GuildRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contains_guild(&self, guild_id: GuildId) -> bool {
        self.guilds.contains_key(&guild_id)
    }

    pub(crate) fn guild(&self, guild_id: GuildId) -> Option<&Guild> {
        self.guilds.get(&guild_id)
    }

    /// Mutable access for role and member changes
    ///
    /// Channels must go through [`GuildRegistry::insert_channel`] and
    /// [`GuildRegistry::remove_channel`] so the index stays current.
    pub(crate) fn guild_mut(&mut self, guild_id: GuildId) -> Option<&mut Guild> {
        self.guilds.get_mut(&guild_id)
    }

    pub(crate) fn guilds(&self) -> impl Iterator<Item = &Guild> {
        self.guilds.values()
    }

    /// Insert or replace a guild, returning the one it replaced
    pub(crate) fn insert_guild(&mut self, guild: Guild) -> Option<Guild> {
        let previous = self.remove_guild(guild.id);
        for channel_id in guild.channel_ids() {
            // Channels claimed by this guild leave any other guild
            if let Some(old) = self.channel_index.insert(channel_id, guild.id) {
                if let Some(other) = self.guilds.get_mut(&old) {
                    other.remove_channel(channel_id);
                }
            }
        }
        self.guilds.insert(guild.id, guild);
        previous
    }

    /// Remove a guild together with its channels
    pub(crate) fn remove_guild(&mut self, guild_id: GuildId) -> Option<Guild> {
        let guild = self.guilds.remove(&guild_id)?;
        for channel_id in guild.channel_ids() {
            self.channel_index.remove(&channel_id);
        }
        Some(guild)
    }

    pub(crate) fn channel(&self, channel_id: ChannelId) -> Option<&GuildChannel> {
        let guild_id = self.channel_index.get(&channel_id)?;
        self.guilds.get(guild_id)?.channel(channel_id)
    }

    /// Register a channel in a known guild
    ///
    /// Returns the channel back if the guild is not registered.
    pub(crate) fn insert_channel(
        &mut self,
        guild_id: GuildId,
        channel: GuildChannel,
    ) -> Result<Option<GuildChannel>, GuildChannel> {
        if !self.contains_guild(guild_id) {
            return Err(channel);
        }

        // A channel moved between guilds leaves its old registry
        let channel_id = channel.id;
        let moved = match self.channel_index.insert(channel_id, guild_id) {
            Some(old) if old != guild_id => self
                .guilds
                .get_mut(&old)
                .and_then(|g| g.remove_channel(channel_id)),
            _ => None,
        };

        match self.guilds.get_mut(&guild_id) {
            Some(guild) => Ok(guild.insert_channel(channel).or(moved)),
            None => Err(channel),
        }
    }

    pub(crate) fn remove_channel(&mut self, channel_id: ChannelId) -> Option<GuildChannel> {
        let guild_id = self.channel_index.remove(&channel_id)?;
        self.guilds.get_mut(&guild_id)?.remove_channel(channel_id)
    }

    pub(crate) fn guild_count(&self) -> usize {
        self.guilds.len()
    }

    pub(crate) fn channel_count(&self) -> usize {
        self.channel_index.len()
    }
}
