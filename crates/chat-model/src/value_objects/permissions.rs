//! Permissions bitflags for guild and channel access control
//!
//! Stored as a 32-bit integer bitfield, matching the gateway payload format.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Guild permission flags
    ///
    /// Bits the server sends that have no named flag are retained, so a
    /// decoded set re-serializes to the same integer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u32 {
        /// Create channel invites
        const CREATE_INSTANT_INVITE = 1 << 0;
        /// Kick members from guild
        const KICK_MEMBERS          = 1 << 1;
        /// Ban members from guild
        const BAN_MEMBERS           = 1 << 2;
        /// Bypass all permission checks and channel overwrites
        const ADMINISTRATOR         = 1 << 3;
        /// Create, edit, delete channels
        const MANAGE_CHANNELS       = 1 << 4;
        /// Edit guild settings
        const MANAGE_GUILD          = 1 << 5;
        /// Add emoji reactions
        const ADD_REACTIONS         = 1 << 6;
        /// Read the audit log
        const VIEW_AUDIT_LOG        = 1 << 7;
        /// View channel and read messages
        const VIEW_CHANNEL          = 1 << 10;
        /// Send messages in text channels
        const SEND_MESSAGES         = 1 << 11;
        /// Send text-to-speech messages
        const SEND_TTS_MESSAGES     = 1 << 12;
        /// Delete other users' messages and reactions
        const MANAGE_MESSAGES       = 1 << 13;
        /// Links are auto-embedded
        const EMBED_LINKS           = 1 << 14;
        /// Upload files and images
        const ATTACH_FILES          = 1 << 15;
        /// Read messages sent before joining the channel
        const READ_MESSAGE_HISTORY  = 1 << 16;
        /// Use @everyone and @here
        const MENTION_EVERYONE      = 1 << 17;
        /// Use emojis from other guilds
        const USE_EXTERNAL_EMOJIS   = 1 << 18;
        /// Join voice channels
        const CONNECT               = 1 << 20;
        /// Speak in voice channels
        const SPEAK                 = 1 << 21;
        /// Server-mute members
        const MUTE_MEMBERS          = 1 << 22;
        /// Server-deafen members
        const DEAFEN_MEMBERS        = 1 << 23;
        /// Move members between voice channels
        const MOVE_MEMBERS          = 1 << 24;
        /// Use voice activity detection
        const USE_VAD               = 1 << 25;
        /// Change own nickname
        const CHANGE_NICKNAME       = 1 << 26;
        /// Change other members' nicknames
        const MANAGE_NICKNAMES      = 1 << 27;
        /// Create, edit, delete, assign roles
        const MANAGE_ROLES          = 1 << 28;
        /// Create, edit, delete webhooks
        const MANAGE_WEBHOOKS       = 1 << 29;
        /// Create, edit, delete emojis
        const MANAGE_EMOJIS         = 1 << 30;

        /// Default permissions for a fresh @everyone role
        const DEFAULT = Self::CREATE_INSTANT_INVITE.bits()
            | Self::ADD_REACTIONS.bits()
            | Self::VIEW_CHANNEL.bits()
            | Self::SEND_MESSAGES.bits()
            | Self::SEND_TTS_MESSAGES.bits()
            | Self::EMBED_LINKS.bits()
            | Self::ATTACH_FILES.bits()
            | Self::READ_MESSAGE_HISTORY.bits()
            | Self::MENTION_EVERYONE.bits()
            | Self::USE_EXTERNAL_EMOJIS.bits()
            | Self::CONNECT.bits()
            | Self::SPEAK.bits()
            | Self::USE_VAD.bits()
            | Self::CHANGE_NICKNAME.bits();

        /// All permissions (administrators, guild owners)
        const ALL = u32::MAX;
    }
}

const NAMES: &[(Permissions, &str)] = &[
    (Permissions::CREATE_INSTANT_INVITE, "CREATE_INSTANT_INVITE"),
    (Permissions::KICK_MEMBERS, "KICK_MEMBERS"),
    (Permissions::BAN_MEMBERS, "BAN_MEMBERS"),
    (Permissions::ADMINISTRATOR, "ADMINISTRATOR"),
    (Permissions::MANAGE_CHANNELS, "MANAGE_CHANNELS"),
    (Permissions::MANAGE_GUILD, "MANAGE_GUILD"),
    (Permissions::ADD_REACTIONS, "ADD_REACTIONS"),
    (Permissions::VIEW_AUDIT_LOG, "VIEW_AUDIT_LOG"),
    (Permissions::VIEW_CHANNEL, "VIEW_CHANNEL"),
    (Permissions::SEND_MESSAGES, "SEND_MESSAGES"),
    (Permissions::SEND_TTS_MESSAGES, "SEND_TTS_MESSAGES"),
    (Permissions::MANAGE_MESSAGES, "MANAGE_MESSAGES"),
    (Permissions::EMBED_LINKS, "EMBED_LINKS"),
    (Permissions::ATTACH_FILES, "ATTACH_FILES"),
    (Permissions::READ_MESSAGE_HISTORY, "READ_MESSAGE_HISTORY"),
    (Permissions::MENTION_EVERYONE, "MENTION_EVERYONE"),
    (Permissions::USE_EXTERNAL_EMOJIS, "USE_EXTERNAL_EMOJIS"),
    (Permissions::CONNECT, "CONNECT"),
    (Permissions::SPEAK, "SPEAK"),
    (Permissions::MUTE_MEMBERS, "MUTE_MEMBERS"),
    (Permissions::DEAFEN_MEMBERS, "DEAFEN_MEMBERS"),
    (Permissions::MOVE_MEMBERS, "MOVE_MEMBERS"),
    (Permissions::USE_VAD, "USE_VAD"),
    (Permissions::CHANGE_NICKNAME, "CHANGE_NICKNAME"),
    (Permissions::MANAGE_NICKNAMES, "MANAGE_NICKNAMES"),
    (Permissions::MANAGE_ROLES, "MANAGE_ROLES"),
    (Permissions::MANAGE_WEBHOOKS, "MANAGE_WEBHOOKS"),
    (Permissions::MANAGE_EMOJIS, "MANAGE_EMOJIS"),
];

impl Permissions {
    /// Check if the permission set contains a required permission
    ///
    /// Administrators bypass all permission checks.
    #[inline]
    pub fn has(&self, permission: Permissions) -> bool {
        if self.contains(Permissions::ADMINISTRATOR) {
            return true;
        }
        self.contains(permission)
    }

    /// Check if the permission set has any of the given permissions
    #[inline]
    pub fn has_any(&self, permissions: Permissions) -> bool {
        if self.contains(Permissions::ADMINISTRATOR) {
            return true;
        }
        self.intersects(permissions)
    }

    /// Check if the permission set has all of the given permissions
    #[inline]
    pub fn has_all(&self, permissions: Permissions) -> bool {
        self.has(permissions)
    }

    /// Combine permissions from multiple roles
    pub fn combine<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Permissions>,
    {
        roles.into_iter().fold(Permissions::empty(), |acc, p| acc | p)
    }

    /// Apply an allow/deny pair: denied bits are cleared first, then allowed bits set
    #[inline]
    #[must_use]
    pub fn overwrite(self, allow: Permissions, deny: Permissions) -> Self {
        (self & !deny) | allow
    }

    /// Parse from string representation (decimal number)
    pub fn parse(s: &str) -> Result<Self, std::num::ParseIntError> {
        s.parse::<u32>().map(Permissions::from_bits_retain)
    }

    /// Get a list of all named permissions that are set
    pub fn list(&self) -> Vec<&'static str> {
        NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Permissions::empty()
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

// Serialize as integer, the format overwrite and role payloads use
impl Serialize for Permissions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

// Deserialize from string or number
impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct PermissionsVisitor;

        impl Visitor<'_> for PermissionsVisitor {
            type Value = Permissions;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer representing permission bits")
            }

            fn visit_i64<E>(self, value: i64) -> Result<Permissions, E>
            where
                E: de::Error,
            {
                u32::try_from(value)
                    .map(Permissions::from_bits_retain)
                    .map_err(|_| de::Error::custom("permission bits out of range"))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Permissions, E>
            where
                E: de::Error,
            {
                u32::try_from(value)
                    .map(Permissions::from_bits_retain)
                    .map_err(|_| de::Error::custom("permission bits out of range"))
            }

            fn visit_str<E>(self, value: &str) -> Result<Permissions, E>
            where
                E: de::Error,
            {
                Permissions::parse(value).map_err(|_| de::Error::custom("invalid permissions string"))
            }
        }

        deserializer.deserialize_any(PermissionsVisitor)
    }
}

impl From<u32> for Permissions {
    fn from(bits: u32) -> Self {
        Permissions::from_bits_retain(bits)
    }
}

impl From<Permissions> for u32 {
    fn from(perms: Permissions) -> Self {
        perms.bits()
    }
}
