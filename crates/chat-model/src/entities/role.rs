//! Role entity - a guild role and its base permissions

use serde_json::Value;

use super::wire;
use crate::error::DecodeResult;
use crate::value_objects::{GuildId, Permissions, RoleId};

/// Role entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub color: u32,
    pub hoist: bool,
    pub position: i32,
    pub permissions: Permissions,
    pub managed: bool,
    pub mentionable: bool,
}

impl Role {
    /// Create a new Role
    pub fn new(id: RoleId, name: impl Into<String>, permissions: Permissions) -> Self {
        Self {
            id,
            name: name.into(),
            color: 0,
            hoist: false,
            position: 0,
            permissions,
            managed: false,
            mentionable: false,
        }
    }

    /// Create the @everyone role for a guild
    pub fn everyone(guild_id: GuildId, permissions: Permissions) -> Self {
        Self::new(guild_id.everyone_role(), "@everyone", permissions)
    }

    /// Decode a role payload; only `id` is required
    pub fn decode(value: &Value) -> DecodeResult<Self> {
        let obj = wire::object(value)?;
        Ok(Self {
            id: wire::required_id(obj, "id")?,
            name: wire::optional_str(obj, "name").unwrap_or_default(),
            color: wire::optional_u32(obj, "color").unwrap_or(0),
            hoist: wire::optional_bool(obj, "hoist").unwrap_or(false),
            position: wire::optional_i32(obj, "position").unwrap_or(0),
            permissions: wire::field(obj, "permissions")
                .and_then(wire::permissions_value)
                .unwrap_or_default(),
            managed: wire::optional_bool(obj, "managed").unwrap_or(false),
            mentionable: wire::optional_bool(obj, "mentionable").unwrap_or(false),
        })
    }
}
