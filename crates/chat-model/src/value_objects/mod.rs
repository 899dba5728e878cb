//! Value objects - immutable types that represent domain concepts

mod permissions;
mod snowflake;

pub use permissions::Permissions;
pub use snowflake::{
    ChannelId, ChannelMarker, GuildId, GuildMarker, Id, IdKind, IdParseError, MessageId,
    MessageMarker, OverwriteId, OverwriteMarker, RoleId, RoleMarker, UserId, UserMarker,
    WebhookId, WebhookMarker, EPOCH,
};
