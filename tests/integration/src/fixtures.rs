//! Test fixtures and payload builders
//!
//! Provides gateway payloads in the shape the client receives them.

use serde_json::{json, Value};

/// Guild payload with an `@everyone` role and nothing else
pub fn guild(id: u64, owner_id: u64, everyone_permissions: u32) -> Value {
    json!({
        "id": id.to_string(),
        "name": format!("guild-{id}"),
        "owner_id": owner_id.to_string(),
        "roles": [role(id, everyone_permissions)],
        "members": [],
        "channels": []
    })
}

/// Add nested entries to a guild payload
pub fn with_entries(mut guild: Value, key: &str, entries: Vec<Value>) -> Value {
    guild[key] = Value::Array(entries);
    guild
}

pub fn role(id: u64, permissions: u32) -> Value {
    json!({
        "id": id.to_string(),
        "name": format!("role-{id}"),
        "permissions": permissions
    })
}

/// Member payload as nested in a guild
pub fn member(user_id: u64, roles: &[u64]) -> Value {
    json!({
        "user": { "id": user_id.to_string() },
        "roles": roles.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "joined_at": "2021-06-01T12:00:00+00:00"
    })
}

/// Member dispatch payload, which carries its guild
pub fn member_event(guild_id: u64, user_id: u64, roles: &[u64]) -> Value {
    let mut payload = member(user_id, roles);
    payload["guild_id"] = json!(guild_id.to_string());
    payload
}

pub fn text_channel(id: u64, guild_id: u64) -> Value {
    json!({
        "id": id.to_string(),
        "type": 0,
        "guild_id": guild_id.to_string(),
        "name": format!("text-{id}"),
        "position": 0,
        "permission_overwrites": []
    })
}

pub fn voice_channel(id: u64, guild_id: u64) -> Value {
    json!({
        "id": id.to_string(),
        "type": 2,
        "guild_id": guild_id.to_string(),
        "name": format!("voice-{id}"),
        "bitrate": 64000,
        "user_limit": 10
    })
}

/// Replace the overwrite list of a channel payload
pub fn with_overwrites(mut channel: Value, overwrites: Vec<Value>) -> Value {
    channel["permission_overwrites"] = Value::Array(overwrites);
    channel
}

pub fn role_overwrite(id: u64, allow: u32, deny: u32) -> Value {
    json!({ "id": id.to_string(), "type": "role", "allow": allow, "deny": deny })
}

pub fn member_overwrite(id: u64, allow: u32, deny: u32) -> Value {
    json!({ "id": id.to_string(), "type": "member", "allow": allow, "deny": deny })
}
