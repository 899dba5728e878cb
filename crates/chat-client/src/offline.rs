//! Offline collaborator - a command surface with no network behind it

use async_trait::async_trait;
use chat_model::{ChannelCommands, ChannelId, MessageId, RequestError, Webhook, WebhookOptions};
use tracing::debug;

/// Answers every command with `503 Service Unavailable`
///
/// Used when replaying recorded traffic, where the registry matters and
/// nothing should leave the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineCommands;

impl OfflineCommands {
    fn refuse(operation: &'static str, channel_id: ChannelId) -> RequestError {
        debug!(channel_id = %channel_id, operation, "Offline, command refused");
        RequestError::new(503, "offline: no network collaborator configured")
    }
}

#[async_trait]
impl ChannelCommands for OfflineCommands {
    async fn create_webhook(
        &self,
        channel_id: ChannelId,
        _options: WebhookOptions,
    ) -> Result<Webhook, RequestError> {
        Err(Self::refuse("create_webhook", channel_id))
    }

    async fn delete_reactions(
        &self,
        channel_id: ChannelId,
        _message_id: MessageId,
    ) -> Result<(), RequestError> {
        Err(Self::refuse("delete_reactions", channel_id))
    }

    async fn get_webhooks(&self, channel_id: ChannelId) -> Result<Vec<Webhook>, RequestError> {
        Err(Self::refuse("get_webhooks", channel_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_command_is_refused() {
        let offline = OfflineCommands;
        let channel_id = ChannelId::new(1);

        let err = offline.get_webhooks(channel_id).await.unwrap_err();
        assert_eq!(err.status, 503);
        assert!(err.is_server_error());
        assert!(offline.delete_reactions(channel_id, MessageId::new(2)).await.is_err());
        assert!(offline
            .create_webhook(channel_id, WebhookOptions::new())
            .await
            .is_err());
    }
}
