//! Gateway events - dispatches that change the guild registry
//!
//! Only the addressing fields of a dispatch are decoded here. Entity bodies
//! stay as JSON until the registry decodes them against its own context.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::wire;
use crate::error::{DecodeError, DecodeResult};
use crate::value_objects::{ChannelId, GuildId, RoleId, UserId};

/// A raw dispatch frame, `{ "t": name, "d": data }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchFrame {
    #[serde(rename = "t")]
    pub name: String,
    #[serde(rename = "d", default)]
    pub data: Value,
}

/// Registry-relevant gateway events
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayEvent {
    // =========================================================================
    // Guild Events
    // =========================================================================
    GuildCreate(Value),
    GuildUpdate(Value),
    GuildDelete {
        guild_id: GuildId,
        /// An outage rather than the client leaving
        unavailable: bool,
    },

    // =========================================================================
    // Channel Events
    // =========================================================================
    ChannelCreate(Value),
    ChannelUpdate(Value),
    ChannelDelete {
        channel_id: ChannelId,
        guild_id: Option<GuildId>,
    },

    // =========================================================================
    // Role Events
    // =========================================================================
    GuildRoleCreate {
        guild_id: GuildId,
        role: Value,
    },
    GuildRoleUpdate {
        guild_id: GuildId,
        role: Value,
    },
    GuildRoleDelete {
        guild_id: GuildId,
        role_id: RoleId,
    },

    // =========================================================================
    // Member Events
    // =========================================================================
    GuildMemberAdd {
        guild_id: GuildId,
        member: Value,
    },
    GuildMemberUpdate {
        guild_id: GuildId,
        member: Value,
    },
    GuildMemberRemove {
        guild_id: GuildId,
        user_id: UserId,
    },
}

impl GatewayEvent {
    /// Map a dispatch name and its data to an event
    ///
    /// Returns `Ok(None)` for dispatches the registry does not track.
    pub fn from_dispatch(name: &str, data: Value) -> DecodeResult<Option<Self>> {
        let event = match name {
            "GUILD_CREATE" => Self::GuildCreate(data),
            "GUILD_UPDATE" => Self::GuildUpdate(data),
            "GUILD_DELETE" => {
                let obj = wire::object(&data)?;
                Self::GuildDelete {
                    guild_id: wire::required_id(obj, "id")?,
                    unavailable: wire::optional_bool(obj, "unavailable").unwrap_or(false),
                }
            }
            "CHANNEL_CREATE" => Self::ChannelCreate(data),
            "CHANNEL_UPDATE" => Self::ChannelUpdate(data),
            "CHANNEL_DELETE" => {
                let obj = wire::object(&data)?;
                Self::ChannelDelete {
                    channel_id: wire::required_id(obj, "id")?,
                    guild_id: wire::optional_id(obj, "guild_id"),
                }
            }
            "GUILD_ROLE_CREATE" | "GUILD_ROLE_UPDATE" => {
                let (guild_id, role) = guild_scoped(data, "role")?;
                if name == "GUILD_ROLE_CREATE" {
                    Self::GuildRoleCreate { guild_id, role }
                } else {
                    Self::GuildRoleUpdate { guild_id, role }
                }
            }
            "GUILD_ROLE_DELETE" => {
                let obj = wire::object(&data)?;
                Self::GuildRoleDelete {
                    guild_id: wire::required_id(obj, "guild_id")?,
                    role_id: wire::required_id(obj, "role_id")?,
                }
            }
            // Member payloads carry `guild_id` next to the member fields
            "GUILD_MEMBER_ADD" => Self::GuildMemberAdd {
                guild_id: guild_id_of(&data)?,
                member: data,
            },
            "GUILD_MEMBER_UPDATE" => Self::GuildMemberUpdate {
                guild_id: guild_id_of(&data)?,
                member: data,
            },
            "GUILD_MEMBER_REMOVE" => {
                let obj = wire::object(&data)?;
                let user = wire::required(obj, "user")?
                    .as_object()
                    .ok_or(DecodeError::invalid("user", "user object"))?;
                Self::GuildMemberRemove {
                    guild_id: wire::required_id(obj, "guild_id")?,
                    user_id: wire::required_id(user, "id")?,
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(event))
    }

    /// Map a raw frame to an event
    pub fn from_frame(frame: DispatchFrame) -> DecodeResult<Option<Self>> {
        Self::from_dispatch(&frame.name, frame.data)
    }

    /// Get the dispatch name
    pub fn name(&self) -> &'static str {
        match self {
            Self::GuildCreate(_) => "GUILD_CREATE",
            Self::GuildUpdate(_) => "GUILD_UPDATE",
            Self::GuildDelete { .. } => "GUILD_DELETE",
            Self::ChannelCreate(_) => "CHANNEL_CREATE",
            Self::ChannelUpdate(_) => "CHANNEL_UPDATE",
            Self::ChannelDelete { .. } => "CHANNEL_DELETE",
            Self::GuildRoleCreate { .. } => "GUILD_ROLE_CREATE",
            Self::GuildRoleUpdate { .. } => "GUILD_ROLE_UPDATE",
            Self::GuildRoleDelete { .. } => "GUILD_ROLE_DELETE",
            Self::GuildMemberAdd { .. } => "GUILD_MEMBER_ADD",
            Self::GuildMemberUpdate { .. } => "GUILD_MEMBER_UPDATE",
            Self::GuildMemberRemove { .. } => "GUILD_MEMBER_REMOVE",
        }
    }

    /// The guild this event addresses, when known without decoding the body
    pub fn guild_id(&self) -> Option<GuildId> {
        match self {
            Self::GuildDelete { guild_id, .. }
            | Self::GuildRoleCreate { guild_id, .. }
            | Self::GuildRoleUpdate { guild_id, .. }
            | Self::GuildRoleDelete { guild_id, .. }
            | Self::GuildMemberAdd { guild_id, .. }
            | Self::GuildMemberUpdate { guild_id, .. }
            | Self::GuildMemberRemove { guild_id, .. } => Some(*guild_id),
            Self::ChannelDelete { guild_id, .. } => *guild_id,
            Self::GuildCreate(data)
            | Self::GuildUpdate(data) => data.as_object().and_then(|o| wire::optional_id(o, "id")),
            Self::ChannelCreate(data) | Self::ChannelUpdate(data) => {
                data.as_object().and_then(|o| wire::optional_id(o, "guild_id"))
            }
        }
    }
}

fn guild_id_of(data: &Value) -> DecodeResult<GuildId> {
    wire::required_id(wire::object(data)?, "guild_id")
}

fn guild_scoped(data: Value, key: &'static str) -> DecodeResult<(GuildId, Value)> {
    let guild_id = guild_id_of(&data)?;
    let mut data = data;
    let body = data
        .as_object_mut()
        .and_then(|obj| obj.remove(key))
        .filter(|v| !v.is_null())
        .ok_or(DecodeError::MissingField(key))?;
    Ok((guild_id, body))
}
