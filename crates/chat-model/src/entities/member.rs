//! Member entity - represents a user's membership in a guild

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use super::wire;
use crate::error::{DecodeError, DecodeResult};
use crate::value_objects::{RoleId, UserId};

/// Guild member entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub user_id: UserId,
    pub nickname: Option<String>,
    /// Held roles, not including @everyone
    pub role_ids: Vec<RoleId>,
    pub joined_at: Option<DateTime<Utc>>,
}

impl Member {
    /// Create a new Member with no roles
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            nickname: None,
            role_ids: Vec::new(),
            joined_at: None,
        }
    }

    /// Create a member holding the given roles
    pub fn with_roles(user_id: UserId, role_ids: impl IntoIterator<Item = RoleId>) -> Self {
        let mut member = Self::new(user_id);
        for role_id in role_ids {
            member.add_role(role_id);
        }
        member
    }

    /// Decode a guild member payload (`{user: {id}, nick, roles, joined_at}`)
    pub fn decode(value: &Value) -> DecodeResult<Self> {
        let obj = wire::object(value)?;
        let user = wire::required(obj, "user")?
            .as_object()
            .ok_or(DecodeError::invalid("user", "user object"))?;
        let user_id = wire::required_id(user, "id")?;

        let mut member = Self::new(user_id);
        member.nickname = wire::optional_str(obj, "nick");
        member.joined_at = wire::optional_timestamp(obj, "joined_at");

        for value in wire::optional_array(obj, "roles").into_iter().flatten() {
            match wire::id_value(value) {
                Some(role_id) => member.add_role(role_id),
                None => warn!(user_id = %user_id, "Skipping malformed member role id"),
            }
        }

        Ok(member)
    }

    /// Check if member has a specific role
    #[inline]
    pub fn has_role(&self, role_id: RoleId) -> bool {
        self.role_ids.contains(&role_id)
    }

    /// Add a role to the member
    pub fn add_role(&mut self, role_id: RoleId) {
        if !self.has_role(role_id) {
            self.role_ids.push(role_id);
        }
    }

    /// Remove a role from the member
    pub fn remove_role(&mut self, role_id: RoleId) {
        self.role_ids.retain(|id| *id != role_id);
    }
}
