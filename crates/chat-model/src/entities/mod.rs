//! Domain entities - records decoded from gateway payloads

mod channel;
mod guild;
mod member;
mod overwrite;
mod role;
mod webhook;
pub(crate) mod wire;

pub use channel::{ChannelKind, GuildChannel};
pub use guild::Guild;
pub use member::Member;
pub use overwrite::{Overwrite, OverwriteKind, PermissionOverwrites};
pub use role::Role;
pub use webhook::{Webhook, WebhookOptions};
