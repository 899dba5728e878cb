//! Owner context - what a channel needs from its root context while decoding

use super::CommandLink;
use crate::value_objects::GuildId;

/// Root context a payload is decoded against
///
/// Decoding only asks whether a guild is registered; the guild itself stays
/// owned by the context and is looked up again by id when needed.
pub trait OwnerContext {
    /// Check whether a guild with this id is registered
    fn has_guild(&self, id: GuildId) -> bool;

    /// Link decoded channels use to reach the client's commands
    fn command_link(&self) -> CommandLink;
}

/// Owner that additionally knows one guild, used while that guild is being decoded
pub(crate) struct WithGuild<'a, C: ?Sized> {
    pub(crate) inner: &'a C,
    pub(crate) guild_id: GuildId,
}

impl<C: OwnerContext + ?Sized> OwnerContext for WithGuild<'_, C> {
    fn has_guild(&self, id: GuildId) -> bool {
        id == self.guild_id || self.inner.has_guild(id)
    }

    fn command_link(&self) -> CommandLink {
        self.inner.command_link()
    }
}
