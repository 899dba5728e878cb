//! Channel command port - the network operations a channel can delegate
//!
//! The domain layer defines the intent-level calls it needs; the client (or
//! any REST implementation) provides them.

use async_trait::async_trait;
use std::fmt;
use std::sync::{Arc, Weak};

use crate::entities::{Webhook, WebhookOptions};
use crate::error::RequestError;
use crate::value_objects::{ChannelId, MessageId};

#[async_trait]
pub trait ChannelCommands: Send + Sync {
    /// Create a webhook in a channel
    async fn create_webhook(
        &self,
        channel_id: ChannelId,
        options: WebhookOptions,
    ) -> Result<Webhook, RequestError>;

    /// Delete every reaction on a message
    async fn delete_reactions(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), RequestError>;

    /// List a channel's webhooks
    async fn get_webhooks(&self, channel_id: ChannelId) -> Result<Vec<Webhook>, RequestError>;
}

/// Non-owning handle from a channel to the command surface of its client
///
/// Holding a link never keeps the client alive. A link is either detached
/// from the start or becomes unusable once the client is dropped.
#[derive(Clone, Default)]
pub struct CommandLink(Option<Weak<dyn ChannelCommands>>);

impl CommandLink {
    /// A link that resolves to nothing
    #[must_use]
    pub const fn detached() -> Self {
        Self(None)
    }

    /// Link to a concrete command implementation
    pub fn attach<T: ChannelCommands + 'static>(commands: &Arc<T>) -> Self {
        let weak: Weak<T> = Arc::downgrade(commands);
        Self(Some(weak))
    }

    /// Link to an already type-erased implementation
    pub fn from_shared(commands: &Arc<dyn ChannelCommands>) -> Self {
        Self(Some(Arc::downgrade(commands)))
    }

    /// Get the command surface if its owner is still alive
    pub fn upgrade(&self) -> Option<Arc<dyn ChannelCommands>> {
        self.0.as_ref().and_then(Weak::upgrade)
    }

    /// Check whether the owner is still alive
    pub fn is_attached(&self) -> bool {
        self.0.as_ref().is_some_and(|weak| weak.strong_count() > 0)
    }
}

impl fmt::Debug for CommandLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_attached() {
            f.write_str("CommandLink(attached)")
        } else {
            f.write_str("CommandLink(detached)")
        }
    }
}
