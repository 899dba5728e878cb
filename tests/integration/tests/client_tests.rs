//! Client Integration Tests
//!
//! Drive a client with gateway dispatches and check the registry, the
//! resolved permissions, and what reaches the command collaborator.
//!
//! Run with: cargo test -p integration-tests --test client_tests

use chat_common::SdkError;
use chat_model::{
    ChannelId, CommandError, DecodeError, GuildId, MessageId, Permissions, UserId, WebhookOptions,
};
use integration_tests::{dispatch, fixtures::*, recording_client, RecordingCommands};
use chat_client::Client;

const VIEW: u32 = 1 << 10;
const SEND: u32 = 1 << 11;
const MANAGE_MESSAGES: u32 = 1 << 13;

// ============================================================================
// Registry Tests
// ============================================================================

#[test]
fn test_channel_before_guild_is_linked_on_arrival() -> anyhow::Result<()> {
    let (client, _commands) = recording_client();

    dispatch(&client, "CHANNEL_CREATE", text_channel(10, 1))?;
    assert_eq!(client.pending_count(), 1);
    assert!(client.channel(ChannelId::new(10)).is_none());

    dispatch(&client, "GUILD_CREATE", guild(1, 99, VIEW))?;

    assert_eq!(client.pending_count(), 0);
    let channel = client.channel(ChannelId::new(10)).expect("channel registered");
    assert_eq!(channel.guild(), Some(GuildId::new(1)));
    assert!(channel.command_link().is_attached());
    Ok(())
}

#[test]
fn test_guild_payload_wins_over_pending_copy() -> anyhow::Result<()> {
    let (client, _commands) = recording_client();

    let mut early = text_channel(10, 1);
    early["name"] = "early".into();
    dispatch(&client, "CHANNEL_CREATE", early)?;

    let payload = with_entries(guild(1, 99, VIEW), "channels", vec![text_channel(10, 1)]);
    dispatch(&client, "GUILD_CREATE", payload)?;

    let channel = client.channel(ChannelId::new(10)).expect("channel registered");
    assert_eq!(channel.name.as_deref(), Some("text-10"));
    assert_eq!(client.channel_count(), 1);
    Ok(())
}

#[test]
fn test_decode_failure_leaves_registry_unchanged() -> anyhow::Result<()> {
    let (client, _commands) = recording_client();
    dispatch(&client, "GUILD_CREATE", guild(1, 99, VIEW))?;
    let before = client.summary();

    let mut broken = text_channel(10, 1);
    broken["id"] = "not-a-snowflake".into();
    let err = dispatch(&client, "CHANNEL_CREATE", broken).unwrap_err();
    let err = err.downcast::<SdkError>()?;
    assert!(matches!(err, SdkError::Decode(DecodeError::InvalidField { .. })));

    assert_eq!(client.summary(), before);
    Ok(())
}

#[test]
fn test_guild_delete_removes_channels_and_pending() -> anyhow::Result<()> {
    let (client, _commands) = recording_client();
    let payload = with_entries(guild(1, 99, VIEW), "channels", vec![text_channel(10, 1)]);
    dispatch(&client, "GUILD_CREATE", payload)?;
    dispatch(&client, "CHANNEL_CREATE", text_channel(20, 2))?;

    dispatch(&client, "GUILD_DELETE", serde_json::json!({ "id": "1" }))?;
    dispatch(&client, "GUILD_DELETE", serde_json::json!({ "id": "2" }))?;

    let summary = client.summary();
    assert_eq!(summary.guilds, 0);
    assert_eq!(summary.channels, 0);
    assert_eq!(summary.pending_channels, 0);
    Ok(())
}

// ============================================================================
// Permission Tests
// ============================================================================

#[test]
fn test_member_overwrite_beats_role_allow() -> anyhow::Result<()> {
    let (client, _commands) = recording_client();

    let payload = with_entries(guild(1, 99, SEND), "roles", vec![role(1, SEND), role(2, 0)]);
    let payload = with_entries(payload, "members", vec![member(5, &[2])]);
    let channel = with_overwrites(
        text_channel(10, 1),
        vec![
            role_overwrite(1, 0, SEND),
            role_overwrite(2, SEND, 0),
            member_overwrite(5, 0, SEND),
        ],
    );
    dispatch(&client, "GUILD_CREATE", with_entries(payload, "channels", vec![channel]))?;

    let permissions = client
        .channel_permissions(GuildId::new(1), UserId::new(5), ChannelId::new(10))
        .expect("member and channel known");
    assert!(!permissions.contains(Permissions::SEND_MESSAGES));
    Ok(())
}

#[test]
fn test_channel_update_replaces_overwrites_wholesale() -> anyhow::Result<()> {
    let (client, _commands) = recording_client();

    let payload = with_entries(guild(1, 99, VIEW | SEND), "members", vec![member(5, &[])]);
    let channel = with_overwrites(text_channel(10, 1), vec![member_overwrite(5, MANAGE_MESSAGES, 0)]);
    dispatch(&client, "GUILD_CREATE", with_entries(payload, "channels", vec![channel]))?;

    let resolved = |client: &Client| {
        client.channel_permissions(GuildId::new(1), UserId::new(5), ChannelId::new(10))
    };
    assert!(resolved(&client).is_some_and(|p| p.contains(Permissions::MANAGE_MESSAGES)));

    let update = with_overwrites(text_channel(10, 1), vec![role_overwrite(1, 0, SEND)]);
    dispatch(&client, "CHANNEL_UPDATE", update)?;

    assert_eq!(resolved(&client), Some(Permissions::VIEW_CHANNEL));
    Ok(())
}

#[test]
fn test_role_changes_flow_into_resolution() -> anyhow::Result<()> {
    let (client, _commands) = recording_client();

    let payload = with_entries(guild(1, 99, VIEW), "members", vec![member(5, &[])]);
    let payload = with_entries(payload, "channels", vec![text_channel(10, 1)]);
    dispatch(&client, "GUILD_CREATE", payload)?;

    dispatch(
        &client,
        "GUILD_ROLE_CREATE",
        serde_json::json!({ "guild_id": "1", "role": role(7, SEND) }),
    )?;
    dispatch(&client, "GUILD_MEMBER_UPDATE", member_event(1, 5, &[7]))?;

    assert_eq!(
        client.channel_permissions(GuildId::new(1), UserId::new(5), ChannelId::new(10)),
        Some(Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES)
    );

    dispatch(
        &client,
        "GUILD_ROLE_DELETE",
        serde_json::json!({ "guild_id": "1", "role_id": "7" }),
    )?;
    assert_eq!(
        client.channel_permissions(GuildId::new(1), UserId::new(5), ChannelId::new(10)),
        Some(Permissions::VIEW_CHANNEL)
    );
    Ok(())
}

#[test]
fn test_owner_holds_everything() -> anyhow::Result<()> {
    let (client, _commands) = recording_client();

    let payload = with_entries(guild(1, 99, 0), "members", vec![member(99, &[])]);
    let channel = with_overwrites(text_channel(10, 1), vec![member_overwrite(99, 0, VIEW | SEND)]);
    dispatch(&client, "GUILD_CREATE", with_entries(payload, "channels", vec![channel]))?;

    assert_eq!(
        client.channel_permissions(GuildId::new(1), UserId::new(99), ChannelId::new(10)),
        Some(Permissions::ALL)
    );
    Ok(())
}

// ============================================================================
// Command Delegation Tests
// ============================================================================

#[tokio::test]
async fn test_text_channel_delegates_commands() -> anyhow::Result<()> {
    let (client, commands) = recording_client();
    let payload = with_entries(guild(1, 99, VIEW), "channels", vec![text_channel(10, 1)]);
    dispatch(&client, "GUILD_CREATE", payload)?;

    let channel = client.channel(ChannelId::new(10)).expect("channel registered");
    let webhook = channel
        .create_webhook(WebhookOptions::new().name("deploys"))
        .await?;
    assert_eq!(webhook.channel_id, ChannelId::new(10));
    assert_eq!(webhook.name.as_deref(), Some("deploys"));

    channel.delete_reactions(MessageId::new(42)).await?;
    assert_eq!(channel.get_webhooks().await?.len(), 1);
    assert_eq!(commands.calls(), 3);
    Ok(())
}

#[tokio::test]
async fn test_voice_channel_never_dispatches() -> anyhow::Result<()> {
    let (client, commands) = recording_client();
    let payload = with_entries(guild(1, 99, VIEW), "channels", vec![voice_channel(11, 1)]);
    dispatch(&client, "GUILD_CREATE", payload)?;

    let channel = client.channel(ChannelId::new(11)).expect("channel registered");
    assert_eq!(channel.bitrate, Some(64000));

    let err = channel.get_webhooks().await.unwrap_err();
    assert!(matches!(err, CommandError::Unsupported { operation: "get_webhooks", .. }));
    assert!(!err.was_dispatched());
    assert!(channel.delete_reactions(MessageId::new(1)).await.is_err());
    assert!(channel.create_webhook(WebhookOptions::new()).await.is_err());

    assert_eq!(commands.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_channel_detached_after_client_drops() -> anyhow::Result<()> {
    let (client, commands) = recording_client();
    let payload = with_entries(guild(1, 99, VIEW), "channels", vec![text_channel(10, 1)]);
    dispatch(&client, "GUILD_CREATE", payload)?;

    let channel = client.channel(ChannelId::new(10)).expect("channel registered");
    drop(client);

    let err = channel.get_webhooks().await.unwrap_err();
    assert!(matches!(err, CommandError::Detached));
    assert_eq!(commands.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_call_in_flight_survives_channel_removal() -> anyhow::Result<()> {
    let commands = RecordingCommands::gated();
    let client = Client::new(commands.clone());
    let payload = with_entries(guild(1, 99, VIEW), "channels", vec![text_channel(10, 1)]);
    dispatch(&client, "GUILD_CREATE", payload)?;

    let channel = client.channel(ChannelId::new(10)).expect("channel registered");
    let call = tokio::spawn(channel.get_webhooks());
    drop(channel);

    dispatch(
        &client,
        "CHANNEL_DELETE",
        serde_json::json!({ "id": "10", "guild_id": "1" }),
    )?;
    drop(client);

    commands.release();
    let webhooks = call.await??;
    assert_eq!(webhooks[0].channel_id, ChannelId::new(10));
    assert_eq!(commands.calls(), 1);
    Ok(())
}
