//! Guild entity - the canonical registry of a server's roles, members, and channels

use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

use super::wire;
use super::{GuildChannel, Member, Role};
use crate::error::DecodeResult;
use crate::traits::{OwnerContext, WithGuild};
use crate::value_objects::{ChannelId, GuildId, RoleId, UserId};

/// Guild (server) entity
#[derive(Debug, Clone)]
pub struct Guild {
    pub id: GuildId,
    pub name: String,
    pub icon: Option<String>,
    pub owner_id: Option<UserId>,
    /// Set when the guild is in an outage and only its id is known
    pub unavailable: bool,
    roles: HashMap<RoleId, Role>,
    members: HashMap<UserId, Member>,
    channels: HashMap<ChannelId, GuildChannel>,
}

impl Guild {
    /// Create a new, empty Guild
    pub fn new(id: GuildId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            icon: None,
            owner_id: None,
            unavailable: false,
            roles: HashMap::new(),
            members: HashMap::new(),
            channels: HashMap::new(),
        }
    }

    /// Decode a full guild payload
    ///
    /// Only the guild `id` is required. Roles, members, and channels that
    /// fail to decode are skipped. Nested channels belong to this guild even
    /// when they omit `guild_id`, and link to it.
    pub fn decode<C>(value: &Value, owner: &C) -> DecodeResult<Self>
    where
        C: OwnerContext + ?Sized,
    {
        let obj = wire::object(value)?;
        let id: GuildId = wire::required_id(obj, "id")?;

        let mut guild = Self::new(id, wire::optional_str(obj, "name").unwrap_or_default());
        guild.icon = wire::optional_str(obj, "icon");
        guild.owner_id = wire::optional_id(obj, "owner_id");
        guild.unavailable = wire::optional_bool(obj, "unavailable").unwrap_or(false);

        for value in wire::optional_array(obj, "roles").into_iter().flatten() {
            match Role::decode(value) {
                Ok(role) => guild.upsert_role(role),
                Err(e) => warn!(guild_id = %id, error = %e, "Skipping malformed role"),
            }
        }

        for value in wire::optional_array(obj, "members").into_iter().flatten() {
            match Member::decode(value) {
                Ok(member) => guild.upsert_member(member),
                Err(e) => warn!(guild_id = %id, error = %e, "Skipping malformed member"),
            }
        }

        let scope = WithGuild {
            inner: owner,
            guild_id: id,
        };
        for value in wire::optional_array(obj, "channels").into_iter().flatten() {
            match GuildChannel::decode_in(value, &scope, Some(id)) {
                Ok(channel) => {
                    guild.insert_channel(channel);
                }
                Err(e) => warn!(guild_id = %id, error = %e, "Skipping malformed channel"),
            }
        }

        Ok(guild)
    }

    /// Adopt the guild-level fields of an update, keeping members and channels
    ///
    /// The role set is replaced only when the update carried roles.
    pub fn apply_update(&mut self, update: Guild) {
        self.name = update.name;
        self.icon = update.icon;
        if update.owner_id.is_some() {
            self.owner_id = update.owner_id;
        }
        self.unavailable = update.unavailable;
        if !update.roles.is_empty() {
            self.roles = update.roles;
        }
    }

    /// Check if a user is the guild owner
    #[inline]
    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.owner_id == Some(user_id)
    }

    /// The @everyone role, if the guild carries it
    pub fn everyone_role(&self) -> Option<&Role> {
        self.roles.get(&self.id.everyone_role())
    }

    pub fn role(&self, role_id: RoleId) -> Option<&Role> {
        self.roles.get(&role_id)
    }

    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.roles.values()
    }

    /// Insert or replace a role
    pub fn upsert_role(&mut self, role: Role) {
        self.roles.insert(role.id, role);
    }

    /// Remove a role, and drop it from every member holding it
    pub fn remove_role(&mut self, role_id: RoleId) -> Option<Role> {
        let removed = self.roles.remove(&role_id)?;
        for member in self.members.values_mut() {
            member.remove_role(role_id);
        }
        Some(removed)
    }

    pub fn member(&self, user_id: UserId) -> Option<&Member> {
        self.members.get(&user_id)
    }

    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    /// Insert or replace a member
    pub fn upsert_member(&mut self, member: Member) {
        self.members.insert(member.user_id, member);
    }

    pub fn remove_member(&mut self, user_id: UserId) -> Option<Member> {
        self.members.remove(&user_id)
    }

    pub fn channel(&self, channel_id: ChannelId) -> Option<&GuildChannel> {
        self.channels.get(&channel_id)
    }

    pub fn channels(&self) -> impl Iterator<Item = &GuildChannel> {
        self.channels.values()
    }

    pub fn channel_ids(&self) -> impl Iterator<Item = ChannelId> + '_ {
        self.channels.keys().copied()
    }

    /// Insert a channel into the registry, returning the record it replaced
    pub fn insert_channel(&mut self, channel: GuildChannel) -> Option<GuildChannel> {
        self.channels.insert(channel.id, channel)
    }

    pub fn remove_channel(&mut self, channel_id: ChannelId) -> Option<GuildChannel> {
        self.channels.remove(&channel_id)
    }

    /// Re-resolve every channel's links against an owner
    pub fn relink_channels<C>(&mut self, owner: &C)
    where
        C: OwnerContext + ?Sized,
    {
        let scope = WithGuild {
            inner: owner,
            guild_id: self.id,
        };
        for channel in self.channels.values_mut() {
            channel.relink(&scope);
        }
    }

    #[inline]
    pub fn role_count(&self) -> usize {
        self.roles.len()
    }

    #[inline]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ChannelKind;
    use crate::traits::CommandLink;
    use crate::value_objects::Permissions;
    use serde_json::json;

    struct Empty;

    impl OwnerContext for Empty {
        fn has_guild(&self, _id: GuildId) -> bool {
            false
        }

        fn command_link(&self) -> CommandLink {
            CommandLink::detached()
        }
    }

    fn payload() -> Value {
        json!({
            "id": "100",
            "name": "Rust Club",
            "icon": "abc",
            "owner_id": "7",
            "roles": [
                { "id": "100", "name": "@everyone", "permissions": 3072 },
                { "id": "200", "name": "mods", "permissions": "8194" },
                { "name": "no id" }
            ],
            "members": [
                { "user": { "id": "7" }, "roles": [] },
                { "user": { "id": "8" }, "roles": ["200"] },
                { "nick": "ghost" }
            ],
            "channels": [
                { "id": "1000", "type": 0, "name": "general" },
                { "id": "1001", "type": 2, "name": "Voice", "bitrate": 64000 },
                { "type": 0, "name": "broken" }
            ]
        })
    }

    #[test]
    fn test_decode_guild() {
        let guild = Guild::decode(&payload(), &Empty).unwrap();
        assert_eq!(guild.id, GuildId::new(100));
        assert_eq!(guild.name, "Rust Club");
        assert!(guild.is_owner(UserId::new(7)));
        assert_eq!(guild.icon.as_deref(), Some("abc"));

        assert_eq!(guild.role_count(), 2);
        assert_eq!(
            guild.everyone_role().map(|r| r.permissions),
            Some(Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES)
        );
        assert_eq!(guild.member_count(), 2);
        assert!(guild.member(UserId::new(8)).unwrap().has_role(RoleId::new(200)));
        assert_eq!(guild.channel_count(), 2);
    }

    #[test]
    fn test_nested_channels_link_to_guild() {
        let guild = Guild::decode(&payload(), &Empty).unwrap();
        let general = guild.channel(ChannelId::new(1000)).unwrap();
        assert_eq!(general.guild_id(), Some(guild.id));
        assert_eq!(general.guild(), Some(guild.id));
        assert_eq!(
            guild.channel(ChannelId::new(1001)).map(|c| c.kind),
            Some(ChannelKind::GuildVoice)
        );
    }

    #[test]
    fn test_nested_channel_naming_another_guild_stays_in_enclosing_one() {
        let payload = json!({
            "id": "100",
            "channels": [{ "id": "1000", "type": 0, "guild_id": "200" }]
        });
        let guild = Guild::decode(&payload, &Empty).unwrap();
        let channel = guild.channel(ChannelId::new(1000)).unwrap();
        assert_eq!(channel.guild_id(), Some(GuildId::new(100)));
        assert_eq!(channel.guild(), Some(GuildId::new(100)));
    }

    #[test]
    fn test_unavailable_guild() {
        let guild = Guild::decode(&json!({ "id": "5", "unavailable": true }), &Empty).unwrap();
        assert!(guild.unavailable);
        assert_eq!(guild.channel_count(), 0);
        assert!(guild.everyone_role().is_none());
    }

    #[test]
    fn test_remove_role_strips_members() {
        let mut guild = Guild::decode(&payload(), &Empty).unwrap();
        assert!(guild.remove_role(RoleId::new(200)).is_some());
        assert!(!guild.member(UserId::new(8)).unwrap().has_role(RoleId::new(200)));
        assert!(guild.remove_role(RoleId::new(200)).is_none());
    }

    #[test]
    fn test_apply_update_keeps_channels() {
        let mut guild = Guild::decode(&payload(), &Empty).unwrap();
        let update = Guild::decode(&json!({ "id": "100", "name": "Rustaceans" }), &Empty).unwrap();
        guild.apply_update(update);

        assert_eq!(guild.name, "Rustaceans");
        assert!(guild.is_owner(UserId::new(7)));
        assert_eq!(guild.role_count(), 2);
        assert_eq!(guild.channel_count(), 2);
        assert_eq!(guild.member_count(), 2);
    }

    #[test]
    fn test_channel_registry() {
        let mut guild = Guild::new(GuildId::new(1), "g");
        let channel = GuildChannel::new(ChannelId::new(10), ChannelKind::GuildText);
        assert!(guild.insert_channel(channel.clone()).is_none());
        assert!(guild.insert_channel(channel).is_some());
        assert_eq!(guild.channel_ids().collect::<Vec<_>>(), vec![ChannelId::new(10)]);
        assert!(guild.remove_channel(ChannelId::new(10)).is_some());
        assert!(guild.channel(ChannelId::new(10)).is_none());
    }
}
