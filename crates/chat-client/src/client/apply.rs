//! Event application - the single writer of the guild registry
//!
//! Each event is decoded completely before the registry changes, so a
//! malformed payload leaves the registry as it was.

use chat_common::SdkResult;
use chat_model::{
    ChannelId, CommandLink, GatewayEvent, Guild, GuildChannel, GuildId, Member, OwnerContext, Role,
    RoleId, UserId,
};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::Client;
use crate::pending::PendingChannels;
use crate::registry::GuildRegistry;

/// Owner context over the registry as it stands
struct Scope<'a> {
    registry: &'a GuildRegistry,
    link: &'a CommandLink,
}

impl OwnerContext for Scope<'_> {
    fn has_guild(&self, id: GuildId) -> bool {
        self.registry.contains_guild(id)
    }

    fn command_link(&self) -> CommandLink {
        self.link.clone()
    }
}

struct Writer<'a> {
    registry: &'a mut GuildRegistry,
    pending: &'a mut PendingChannels,
    link: CommandLink,
}

impl Client {
    /// Apply one gateway event to the registry
    ///
    /// Events must be applied one at a time in delivery order.
    #[instrument(skip_all, fields(event = event.name()))]
    pub fn apply(&self, event: GatewayEvent) -> SdkResult<()> {
        let link = self.command_link();
        let mut registry = self.state.registry.write();
        let mut pending = self.state.pending.lock();
        let mut writer = Writer {
            registry: &mut registry,
            pending: &mut pending,
            link,
        };

        match event {
            GatewayEvent::GuildCreate(data) => writer.guild_create(&data),
            GatewayEvent::GuildUpdate(data) => writer.guild_update(&data),
            GatewayEvent::GuildDelete {
                guild_id,
                unavailable,
            } => {
                writer.guild_delete(guild_id, unavailable);
                Ok(())
            }
            GatewayEvent::ChannelCreate(data) | GatewayEvent::ChannelUpdate(data) => {
                writer.channel_upsert(&data)
            }
            GatewayEvent::ChannelDelete {
                channel_id,
                guild_id,
            } => {
                writer.channel_delete(channel_id, guild_id);
                Ok(())
            }
            GatewayEvent::GuildRoleCreate { guild_id, role }
            | GatewayEvent::GuildRoleUpdate { guild_id, role } => writer.role_upsert(guild_id, &role),
            GatewayEvent::GuildRoleDelete { guild_id, role_id } => {
                writer.role_delete(guild_id, role_id);
                Ok(())
            }
            GatewayEvent::GuildMemberAdd { guild_id, member }
            | GatewayEvent::GuildMemberUpdate { guild_id, member } => {
                writer.member_upsert(guild_id, &member)
            }
            GatewayEvent::GuildMemberRemove { guild_id, user_id } => {
                writer.member_remove(guild_id, user_id);
                Ok(())
            }
        }
    }

    /// Map a raw dispatch and apply it
    ///
    /// Returns `false` for dispatches the registry does not track.
    pub fn apply_dispatch(&self, name: &str, data: Value) -> SdkResult<bool> {
        match GatewayEvent::from_dispatch(name, data)? {
            Some(event) => {
                self.apply(event)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl Writer<'_> {
    fn scope(&self) -> Scope<'_> {
        Scope {
            registry: &*self.registry,
            link: &self.link,
        }
    }

    fn guild_create(&mut self, data: &Value) -> SdkResult<()> {
        let guild = Guild::decode(data, &self.scope())?;
        let guild_id = guild.id;
        let channels = guild.channel_count();

        if self.registry.insert_guild(guild).is_some() {
            debug!(guild_id = %guild_id, "Guild replaced");
        }

        // Channels that arrived first; the guild payload wins where both exist
        let mut absorbed = 0usize;
        for mut channel in self.pending.take_for_guild(guild_id) {
            let known = self
                .registry
                .guild(guild_id)
                .is_some_and(|g| g.channel(channel.id).is_some());
            if known {
                continue;
            }
            channel.relink(&self.scope());
            if self.registry.insert_channel(guild_id, channel).is_ok() {
                absorbed += 1;
            }
        }

        debug!(guild_id = %guild_id, channels, absorbed, "Guild registered");
        Ok(())
    }

    fn guild_update(&mut self, data: &Value) -> SdkResult<()> {
        let update = Guild::decode(data, &self.scope())?;
        let guild_id = update.id;
        match self.registry.guild_mut(guild_id) {
            Some(guild) => {
                guild.apply_update(update);
                debug!(guild_id = %guild_id, "Guild updated");
            }
            None => debug!(guild_id = %guild_id, "Update for unknown guild ignored"),
        }
        Ok(())
    }

    fn guild_delete(&mut self, guild_id: GuildId, unavailable: bool) {
        if unavailable {
            if let Some(guild) = self.registry.guild_mut(guild_id) {
                guild.unavailable = true;
                debug!(guild_id = %guild_id, "Guild unavailable");
            }
            return;
        }

        let removed = self.registry.remove_guild(guild_id);
        let discarded = self.pending.discard_guild(guild_id);
        debug!(
            guild_id = %guild_id,
            removed = removed.is_some(),
            discarded,
            "Guild removed"
        );
    }

    fn channel_upsert(&mut self, data: &Value) -> SdkResult<()> {
        let channel = GuildChannel::decode(data, &self.scope())?;
        let channel_id = channel.id;

        let channel = match channel.guild() {
            Some(guild_id) => match self.registry.insert_channel(guild_id, channel) {
                Ok(replaced) => {
                    self.pending.remove(channel_id);
                    debug!(
                        channel_id = %channel_id,
                        guild_id = %guild_id,
                        replaced = replaced.is_some(),
                        "Channel registered"
                    );
                    return Ok(());
                }
                Err(channel) => channel,
            },
            None => channel,
        };

        // A registered channel moving to an unknown guild leaves its old one
        if self.registry.remove_channel(channel_id).is_some() {
            debug!(channel_id = %channel_id, "Channel left its registered guild");
        }

        if channel.guild_id().is_none() {
            debug!(channel_id = %channel_id, "Channel outside any guild ignored");
            return Ok(());
        }

        debug!(channel_id = %channel_id, guild_id = ?channel.guild_id(), "Channel pending its guild");
        if let Some(evicted) = self.pending.insert(channel) {
            warn!(
                channel_id = %evicted.id,
                guild_id = ?evicted.guild_id(),
                "Pending channel buffer full, dropping channel"
            );
        }
        Ok(())
    }

    fn channel_delete(&mut self, channel_id: ChannelId, guild_id: Option<GuildId>) {
        let removed = self
            .registry
            .remove_channel(channel_id)
            .or_else(|| self.pending.remove(channel_id));
        debug!(
            channel_id = %channel_id,
            guild_id = ?guild_id,
            removed = removed.is_some(),
            "Channel deleted"
        );
    }

    fn role_upsert(&mut self, guild_id: GuildId, data: &Value) -> SdkResult<()> {
        let role = Role::decode(data)?;
        match self.registry.guild_mut(guild_id) {
            Some(guild) => {
                debug!(guild_id = %guild_id, role_id = %role.id, "Role stored");
                guild.upsert_role(role);
            }
            None => debug!(guild_id = %guild_id, "Role for unknown guild ignored"),
        }
        Ok(())
    }

    fn role_delete(&mut self, guild_id: GuildId, role_id: RoleId) {
        let removed = self
            .registry
            .guild_mut(guild_id)
            .and_then(|guild| guild.remove_role(role_id));
        debug!(guild_id = %guild_id, role_id = %role_id, removed = removed.is_some(), "Role deleted");
    }

    fn member_upsert(&mut self, guild_id: GuildId, data: &Value) -> SdkResult<()> {
        let mut member = Member::decode(data)?;
        let Some(guild) = self.registry.guild_mut(guild_id) else {
            debug!(guild_id = %guild_id, "Member for unknown guild ignored");
            return Ok(());
        };

        // Updates omit the join time
        if member.joined_at.is_none() {
            member.joined_at = guild.member(member.user_id).and_then(|m| m.joined_at);
        }
        debug!(guild_id = %guild_id, user_id = %member.user_id, "Member stored");
        guild.upsert_member(member);
        Ok(())
    }

    fn member_remove(&mut self, guild_id: GuildId, user_id: UserId) {
        let removed = self
            .registry
            .guild_mut(guild_id)
            .and_then(|guild| guild.remove_member(user_id));
        debug!(guild_id = %guild_id, user_id = %user_id, removed = removed.is_some(), "Member removed");
    }
}
