//! Pending channels - channels that arrived before their guild

use chat_model::{ChannelId, GuildChannel, GuildId};
use std::collections::{HashMap, VecDeque};

/// Bounded buffer of channels waiting for their guild
///
/// Oldest entries are evicted first once the limit is reached. Updating a
/// buffered channel keeps its place in line.
#[derive(Debug)]
pub(crate) struct PendingChannels {
    limit: usize,
    order: VecDeque<ChannelId>,
    channels: HashMap<ChannelId, GuildChannel>,
}

impl PendingChannels {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            limit,
            order: VecDeque::new(),
            channels: HashMap::new(),
        }
    }

    /// Buffer a channel, returning whatever had to be dropped to make room
    ///
    /// With a limit of zero the channel itself is returned.
    pub(crate) fn insert(&mut self, channel: GuildChannel) -> Option<GuildChannel> {
        if self.limit == 0 {
            return Some(channel);
        }

        let channel_id = channel.id;
        if self.channels.insert(channel_id, channel).is_some() {
            return None;
        }
        self.order.push_back(channel_id);

        if self.order.len() > self.limit {
            let oldest = self.order.pop_front()?;
            return self.channels.remove(&oldest);
        }
        None
    }

    pub(crate) fn get(&self, channel_id: ChannelId) -> Option<&GuildChannel> {
        self.channels.get(&channel_id)
    }

    pub(crate) fn remove(&mut self, channel_id: ChannelId) -> Option<GuildChannel> {
        let channel = self.channels.remove(&channel_id)?;
        self.order.retain(|id| *id != channel_id);
        Some(channel)
    }

    /// Take every channel claiming the given guild, in arrival order
    pub(crate) fn take_for_guild(&mut self, guild_id: GuildId) -> Vec<GuildChannel> {
        let mut taken = Vec::new();
        let channels = &mut self.channels;
        self.order.retain(|id| {
            let belongs = channels
                .get(id)
                .is_some_and(|c| c.guild_id() == Some(guild_id));
            if belongs {
                if let Some(channel) = channels.remove(id) {
                    taken.push(channel);
                }
            }
            !belongs
        });
        taken
    }

    /// Drop every channel claiming the given guild
    pub(crate) fn discard_guild(&mut self, guild_id: GuildId) -> usize {
        self.take_for_guild(guild_id).len()
    }

    pub(crate) fn len(&self) -> usize {
        self.channels.len()
    }
}
