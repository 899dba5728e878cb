//! Permission resolver - effective permissions of a member in a channel
//!
//! Resolution order is fixed: role grants make the base, then the channel's
//! `@everyone` overwrite, then the combined overwrites of the member's roles,
//! then the member's own overwrite. Each tier clears its denies before adding
//! its allows.

use crate::entities::{Guild, GuildChannel, Member, PermissionOverwrites};
use crate::value_objects::{GuildId, Permissions, RoleId, UserId};

/// Guild-level permissions of a member, before channel overwrites
///
/// Union of the `@everyone` role and every held role the guild knows.
/// The guild owner and administrators get [`Permissions::ALL`].
pub fn base_permissions(member: &Member, guild: &Guild) -> Permissions {
    if guild.is_owner(member.user_id) {
        return Permissions::ALL;
    }

    let mut permissions = guild
        .everyone_role()
        .map(|role| role.permissions)
        .unwrap_or_default();

    for role_id in &member.role_ids {
        if let Some(role) = guild.role(*role_id) {
            permissions |= role.permissions;
        }
    }

    if permissions.contains(Permissions::ADMINISTRATOR) {
        return Permissions::ALL;
    }
    permissions
}

/// Apply a channel's overwrites to externally computed base permissions
///
/// A base holding ADMINISTRATOR is returned as [`Permissions::ALL`] without
/// looking at any overwrite. `role_ids` should not include `@everyone`; if it
/// does, that entry is ignored here since the everyone tier already ran.
pub fn apply_overwrites(
    base: Permissions,
    guild_id: GuildId,
    role_ids: &[RoleId],
    user_id: UserId,
    overwrites: &PermissionOverwrites,
) -> Permissions {
    if base.contains(Permissions::ADMINISTRATOR) {
        return Permissions::ALL;
    }

    let mut permissions = base;

    if let Some(everyone) = overwrites.everyone(guild_id) {
        permissions = permissions.overwrite(everyone.allow, everyone.deny);
    }

    let everyone_role = guild_id.everyone_role();
    let (allow, deny) = overwrites
        .roles(role_ids.iter().filter(move |id| **id != everyone_role))
        .fold(
            (Permissions::empty(), Permissions::empty()),
            |(allow, deny), o| (allow | o.allow, deny | o.deny),
        );
    permissions = permissions.overwrite(allow, deny);

    if let Some(member) = overwrites.member(user_id) {
        permissions = permissions.overwrite(member.allow, member.deny);
    }

    permissions
}

/// Effective permissions of `member` in `channel` of `guild`
pub fn resolve(member: &Member, channel: &GuildChannel, guild: &Guild) -> Permissions {
    let base = base_permissions(member, guild);
    apply_overwrites(
        base,
        guild.id,
        &member.role_ids,
        member.user_id,
        channel.overwrites(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ChannelKind, Overwrite, Role};
    use crate::value_objects::ChannelId;

    const GUILD: GuildId = GuildId::new(500);
    const USER: UserId = UserId::new(42);
    const HELPER: RoleId = RoleId::new(600);
    const MUTED: RoleId = RoleId::new(601);

    fn guild(everyone: Permissions) -> Guild {
        let mut guild = Guild::new(GUILD, "test");
        guild.owner_id = Some(UserId::new(1));
        guild.upsert_role(Role::everyone(GUILD, everyone));
        guild.upsert_role(Role::new(HELPER, "helper", Permissions::empty()));
        guild.upsert_role(Role::new(MUTED, "muted", Permissions::empty()));
        guild
    }

    fn channel(overwrites: impl IntoIterator<Item = Overwrite>) -> GuildChannel {
        GuildChannel::new(ChannelId::new(700), ChannelKind::GuildText)
            .with_overwrites(overwrites.into_iter().collect())
    }

    #[test]
    fn test_member_overwrite_wins() {
        let guild = guild(Permissions::SEND_MESSAGES);
        let member = Member::with_roles(USER, [HELPER]);
        let channel = channel([
            Overwrite::role(GUILD.everyone_role(), Permissions::empty(), Permissions::SEND_MESSAGES),
            Overwrite::role(HELPER, Permissions::SEND_MESSAGES, Permissions::empty()),
            Overwrite::member(USER, Permissions::empty(), Permissions::SEND_MESSAGES),
        ]);

        let resolved = resolve(&member, &channel, &guild);
        assert!(!resolved.contains(Permissions::SEND_MESSAGES));
    }

    #[test]
    fn test_role_allow_beats_everyone_deny() {
        let guild = guild(Permissions::SEND_MESSAGES | Permissions::VIEW_CHANNEL);
        let member = Member::with_roles(USER, [HELPER]);
        let channel = channel([
            Overwrite::role(GUILD.everyone_role(), Permissions::empty(), Permissions::SEND_MESSAGES),
            Overwrite::role(HELPER, Permissions::SEND_MESSAGES, Permissions::empty()),
        ]);

        assert_eq!(
            resolve(&member, &channel, &guild),
            Permissions::SEND_MESSAGES | Permissions::VIEW_CHANNEL
        );
    }

    #[test]
    fn test_role_overwrites_combine_before_applying() {
        // One role allows what another denies; the combined allow is added after the combined deny
        let guild = guild(Permissions::empty());
        let member = Member::with_roles(USER, [HELPER, MUTED]);
        let channel = channel([
            Overwrite::role(HELPER, Permissions::SEND_MESSAGES, Permissions::empty()),
            Overwrite::role(MUTED, Permissions::empty(), Permissions::SEND_MESSAGES),
        ]);

        assert!(resolve(&member, &channel, &guild).contains(Permissions::SEND_MESSAGES));
    }

    #[test]
    fn test_overlapping_allow_and_deny() {
        let guild = guild(Permissions::empty());
        let member = Member::new(USER);
        let channel = channel([Overwrite::member(
            USER,
            Permissions::ATTACH_FILES,
            Permissions::ATTACH_FILES,
        )]);

        assert_eq!(resolve(&member, &channel, &guild), Permissions::ATTACH_FILES);
    }

    #[test]
    fn test_administrator_short_circuit() {
        let mut guild = guild(Permissions::empty());
        guild.upsert_role(Role::new(RoleId::new(9), "admin", Permissions::ADMINISTRATOR));
        let member = Member::with_roles(USER, [RoleId::new(9)]);
        let channel = channel([
            Overwrite::role(GUILD.everyone_role(), Permissions::empty(), Permissions::ALL),
            Overwrite::member(USER, Permissions::empty(), Permissions::ALL),
        ]);

        assert_eq!(resolve(&member, &channel, &guild), Permissions::ALL);
    }

    #[test]
    fn test_owner_gets_everything() {
        let guild = guild(Permissions::empty());
        let owner = Member::new(UserId::new(1));
        let channel = channel([Overwrite::member(
            UserId::new(1),
            Permissions::empty(),
            Permissions::VIEW_CHANNEL,
        )]);

        assert_eq!(resolve(&owner, &channel, &guild), Permissions::ALL);
    }

    #[test]
    fn test_unknown_roles_and_everyone_in_role_list_are_ignored() {
        let guild = guild(Permissions::VIEW_CHANNEL);
        let member = Member::with_roles(USER, [RoleId::new(999), GUILD.everyone_role()]);
        assert_eq!(base_permissions(&member, &guild), Permissions::VIEW_CHANNEL);

        let channel = channel([Overwrite::role(
            GUILD.everyone_role(),
            Permissions::SEND_MESSAGES,
            Permissions::VIEW_CHANNEL,
        )]);
        assert_eq!(resolve(&member, &channel, &guild), Permissions::SEND_MESSAGES);
    }

    #[test]
    fn test_apply_overwrites_with_external_base() {
        let overwrites: PermissionOverwrites = [Overwrite::role(
            HELPER,
            Permissions::MANAGE_MESSAGES,
            Permissions::SEND_MESSAGES,
        )]
        .into_iter()
        .collect();

        let result = apply_overwrites(
            Permissions::SEND_MESSAGES | Permissions::VIEW_CHANNEL,
            GUILD,
            &[HELPER],
            USER,
            &overwrites,
        );
        assert_eq!(result, Permissions::VIEW_CHANNEL | Permissions::MANAGE_MESSAGES);

        let without_role = apply_overwrites(Permissions::SEND_MESSAGES, GUILD, &[], USER, &overwrites);
        assert_eq!(without_role, Permissions::SEND_MESSAGES);
    }
}
