//! Traits (ports) - the seams between the entity model and its owners

mod commands;
mod owner;

pub use commands::{ChannelCommands, CommandLink};
pub use owner::OwnerContext;
pub(crate) use owner::WithGuild;
