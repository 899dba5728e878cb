//! # chat-model
//!
//! Domain layer of the client SDK: typed identifiers, guild channels and
//! their permission overwrites, the guild registry, permission resolution,
//! and the command port channels delegate network calls through.
//! This crate performs no I/O of its own.

pub mod entities;
pub mod error;
pub mod events;
pub mod resolver;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    ChannelKind, Guild, GuildChannel, Member, Overwrite, OverwriteKind, PermissionOverwrites,
    Role, Webhook, WebhookOptions,
};
pub use error::{CommandError, CommandResult, DecodeError, DecodeResult, RequestError};
pub use events::{DispatchFrame, GatewayEvent};
pub use resolver::{apply_overwrites, base_permissions, resolve};
pub use traits::{ChannelCommands, CommandLink, OwnerContext};
pub use value_objects::{
    ChannelId, GuildId, Id, IdKind, IdParseError, MessageId, OverwriteId, Permissions, RoleId,
    UserId, WebhookId,
};
