//! Permission overwrites - per-channel allow/deny pairs for a role or member

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

use super::wire;
use crate::error::{DecodeError, DecodeResult};
use crate::value_objects::{GuildId, OverwriteId, Permissions, RoleId, UserId};

/// What an overwrite targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwriteKind {
    Role,
    Member,
}

impl OverwriteKind {
    /// Get the wire string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Role => "role",
            Self::Member => "member",
        }
    }

    /// Accepts `"role"`/`"member"` and the numeric form `0`/`1`
    fn from_wire(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => match s.as_str() {
                "role" => Some(Self::Role),
                "member" => Some(Self::Member),
                _ => None,
            },
            Value::Number(n) => match n.as_u64() {
                Some(0) => Some(Self::Role),
                Some(1) => Some(Self::Member),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for OverwriteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission overwrite record
///
/// `allow` and `deny` are taken as the server sent them; they may overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Overwrite {
    pub id: OverwriteId,
    #[serde(rename = "type")]
    pub kind: OverwriteKind,
    pub allow: Permissions,
    pub deny: Permissions,
}

impl Overwrite {
    /// Create a role overwrite
    pub fn role(id: RoleId, allow: Permissions, deny: Permissions) -> Self {
        Self {
            id: id.into(),
            kind: OverwriteKind::Role,
            allow,
            deny,
        }
    }

    /// Create a member overwrite
    pub fn member(id: UserId, allow: Permissions, deny: Permissions) -> Self {
        Self {
            id: id.into(),
            kind: OverwriteKind::Member,
            allow,
            deny,
        }
    }

    /// Decode a single `{id, type, allow, deny}` entry; every field is required
    pub fn decode(value: &Value) -> DecodeResult<Self> {
        let obj = wire::object(value)?;
        let id = wire::required_id(obj, "id")?;
        let kind = OverwriteKind::from_wire(wire::required(obj, "type")?)
            .ok_or(DecodeError::invalid("type", "\"role\" or \"member\""))?;
        let allow = wire::permissions_value(wire::required(obj, "allow")?)
            .ok_or(DecodeError::invalid("allow", "permission integer"))?;
        let deny = wire::permissions_value(wire::required(obj, "deny")?)
            .ok_or(DecodeError::invalid("deny", "permission integer"))?;

        Ok(Self {
            id,
            kind,
            allow,
            deny,
        })
    }
}

impl<'de> Deserialize<'de> for Overwrite {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Overwrite::decode(&value).map_err(serde::de::Error::custom)
    }
}

/// Overwrites attached to one channel, keyed by target id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionOverwrites {
    entries: HashMap<OverwriteId, Overwrite>,
}

impl PermissionOverwrites {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a `permission_overwrites` array
    ///
    /// Malformed entries are skipped with a warning; they never fail the
    /// surrounding channel. Later entries replace earlier ones with the same id.
    pub fn decode_list(values: &[Value]) -> Self {
        let mut overwrites = Self::new();
        for (index, value) in values.iter().enumerate() {
            match Overwrite::decode(value) {
                Ok(overwrite) => overwrites.insert(overwrite),
                Err(e) => warn!(index, error = %e, "Skipping malformed permission overwrite"),
            }
        }
        overwrites
    }

    fn insert(&mut self, overwrite: Overwrite) {
        self.entries.insert(overwrite.id, overwrite);
    }

    /// Get the overwrite for a target id regardless of kind
    pub fn get(&self, id: OverwriteId) -> Option<&Overwrite> {
        self.entries.get(&id)
    }

    /// The guild-wide `@everyone` overwrite
    pub fn everyone(&self, guild_id: GuildId) -> Option<&Overwrite> {
        self.role(guild_id.everyone_role())
    }

    /// The overwrite for a role, ignoring member overwrites that share its id
    pub fn role(&self, role_id: RoleId) -> Option<&Overwrite> {
        self.get(role_id.into())
            .filter(|o| o.kind == OverwriteKind::Role)
    }

    /// Role overwrites matching any of the given roles
    pub fn roles<'a, I>(&'a self, role_ids: I) -> impl Iterator<Item = &'a Overwrite> + 'a
    where
        I: IntoIterator<Item = &'a RoleId>,
        I::IntoIter: 'a,
    {
        role_ids.into_iter().filter_map(|id| self.role(*id))
    }

    /// The overwrite for a specific member
    pub fn member(&self, user_id: UserId) -> Option<&Overwrite> {
        self.get(user_id.into())
            .filter(|o| o.kind == OverwriteKind::Member)
    }

    /// Replace every entry, as a permission update does
    pub fn replace_all<I: IntoIterator<Item = Overwrite>>(&mut self, overwrites: I) {
        self.entries.clear();
        for overwrite in overwrites {
            self.insert(overwrite);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Overwrite> {
        self.entries.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by id, for stable output
    pub fn to_sorted_vec(&self) -> Vec<Overwrite> {
        let mut list: Vec<Overwrite> = self.entries.values().copied().collect();
        list.sort_by_key(|o| o.id);
        list
    }
}

impl FromIterator<Overwrite> for PermissionOverwrites {
    fn from_iter<I: IntoIterator<Item = Overwrite>>(iter: I) -> Self {
        let mut overwrites = Self::new();
        for overwrite in iter {
            overwrites.insert(overwrite);
        }
        overwrites
    }
}

// Serialize back to the wire array form
impl Serialize for PermissionOverwrites {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.to_sorted_vec())
    }
}
