//! Test helpers for integration tests
//!
//! Provides a command collaborator that records what reaches it and can
//! hold a call open until the test releases it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chat_client::Client;
use chat_model::{
    ChannelCommands, ChannelId, GatewayEvent, MessageId, RequestError, Webhook, WebhookId,
    WebhookOptions,
};
use serde_json::Value;
use tokio::sync::Notify;

/// Collaborator counting every call that reaches it
#[derive(Default)]
pub struct RecordingCommands {
    calls: AtomicUsize,
    gate: Option<Notify>,
}

impl RecordingCommands {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A collaborator whose calls wait for [`RecordingCommands::release`]
    pub fn gated() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            gate: Some(Notify::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Let one held call complete
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    async fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl ChannelCommands for RecordingCommands {
    async fn create_webhook(
        &self,
        channel_id: ChannelId,
        options: WebhookOptions,
    ) -> Result<Webhook, RequestError> {
        self.record().await;
        Ok(webhook(channel_id, options.name))
    }

    async fn delete_reactions(
        &self,
        _channel_id: ChannelId,
        _message_id: MessageId,
    ) -> Result<(), RequestError> {
        self.record().await;
        Ok(())
    }

    async fn get_webhooks(&self, channel_id: ChannelId) -> Result<Vec<Webhook>, RequestError> {
        self.record().await;
        Ok(vec![webhook(channel_id, Some("existing".to_string()))])
    }
}

fn webhook(channel_id: ChannelId, name: Option<String>) -> Webhook {
    Webhook {
        id: WebhookId::new(500),
        channel_id,
        guild_id: None,
        name,
        avatar: None,
        token: Some("token".to_string()),
        user_id: None,
    }
}

/// Client wired to a recording collaborator
pub fn recording_client() -> (Client, Arc<RecordingCommands>) {
    let commands = RecordingCommands::new();
    let client = Client::new(commands.clone());
    (client, commands)
}

/// Apply a named dispatch, failing the test if it is not tracked
pub fn dispatch(client: &Client, name: &str, data: Value) -> anyhow::Result<()> {
    let event = GatewayEvent::from_dispatch(name, data)?
        .ok_or_else(|| anyhow::anyhow!("{name} is not a registry event"))?;
    client.apply(event)?;
    Ok(())
}
