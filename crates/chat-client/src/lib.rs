//! # chat-client
//!
//! Root client context. Holds the guild registry, applies gateway events to
//! it one at a time, and hands channels a link to the network collaborator
//! their commands are delegated to.

pub mod client;
pub mod offline;
mod pending;
mod registry;

pub use client::{Client, RegistrySummary};
pub use offline::OfflineCommands;
