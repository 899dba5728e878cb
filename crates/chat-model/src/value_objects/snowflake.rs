//! Snowflake IDs - platform-issued 64-bit identifiers, one nominal type per entity kind
//!
//! Structure:
//! - Bits 63-22: Timestamp (milliseconds since the platform epoch)
//! - Bits 21-17: Internal worker ID
//! - Bits 16-12: Internal process ID
//! - Bits 11-0:  Increment
//!
//! Every kind shares the same [`Id`] representation but carries a zero-sized
//! marker, so a `ChannelId` can never be compared with or passed as a
//! `MessageId` even when both hold the same number.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Platform epoch: 2015-01-01 00:00:00 UTC (milliseconds)
pub const EPOCH: u64 = 1_420_070_400_000;

/// Marker trait implemented by each identifier kind
pub trait IdKind: 'static {
    /// Name of the identifier type, used in `Debug` output and parse errors
    const NAME: &'static str;
}

/// Channel identifier kind
#[derive(Debug)]
pub enum ChannelMarker {}

/// Message identifier kind
#[derive(Debug)]
pub enum MessageMarker {}

/// Permission overwrite identifier kind (a role or user id on the wire)
#[derive(Debug)]
pub enum OverwriteMarker {}

/// Guild identifier kind
#[derive(Debug)]
pub enum GuildMarker {}

/// User identifier kind
#[derive(Debug)]
pub enum UserMarker {}

/// Role identifier kind
#[derive(Debug)]
pub enum RoleMarker {}

/// Webhook identifier kind
#[derive(Debug)]
pub enum WebhookMarker {}

impl IdKind for ChannelMarker {
    const NAME: &'static str = "ChannelId";
}

impl IdKind for MessageMarker {
    const NAME: &'static str = "MessageId";
}

impl IdKind for OverwriteMarker {
    const NAME: &'static str = "OverwriteId";
}

impl IdKind for GuildMarker {
    const NAME: &'static str = "GuildId";
}

impl IdKind for UserMarker {
    const NAME: &'static str = "UserId";
}

impl IdKind for RoleMarker {
    const NAME: &'static str = "RoleId";
}

impl IdKind for WebhookMarker {
    const NAME: &'static str = "WebhookId";
}

pub type ChannelId = Id<ChannelMarker>;
pub type MessageId = Id<MessageMarker>;
pub type OverwriteId = Id<OverwriteMarker>;
pub type GuildId = Id<GuildMarker>;
pub type UserId = Id<UserMarker>;
pub type RoleId = Id<RoleMarker>;
pub type WebhookId = Id<WebhookMarker>;

/// Typed snowflake identifier
///
/// Ids of different kinds never mix, even when they carry the same value:
///
/// ```compile_fail
/// use chat_model::{ChannelId, MessageId};
///
/// let same = ChannelId::new(42) == MessageId::new(42);
/// ```
///
/// ```compile_fail
/// use chat_model::{ChannelId, MessageId};
///
/// fn channel(id: ChannelId) -> u64 {
///     id.get()
/// }
/// channel(MessageId::new(42));
/// ```
pub struct Id<K: IdKind> {
    value: u64,
    kind: PhantomData<fn() -> K>,
}

impl<K: IdKind> Id<K> {
    /// Create an identifier from a raw value
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self {
            value,
            kind: PhantomData,
        }
    }

    /// Get the inner u64 value
    #[inline]
    pub const fn get(self) -> u64 {
        self.value
    }

    /// Parse from a decimal string
    ///
    /// Only plain ASCII digits are accepted; signs, whitespace, empty input
    /// and values outside 64 bits yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse::<u64>().ok().map(Self::new)
    }

    /// Extract timestamp (milliseconds since Unix epoch)
    #[inline]
    pub const fn timestamp(self) -> u64 {
        (self.value >> 22) + EPOCH
    }

    /// Convert timestamp to DateTime<Utc>
    pub fn created_at(self) -> Option<chrono::DateTime<chrono::Utc>> {
        i64::try_from(self.timestamp())
            .ok()
            .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)
    }
}

impl Id<GuildMarker> {
    /// The `@everyone` role of this guild, which shares the guild's id
    #[inline]
    pub const fn everyone_role(self) -> RoleId {
        Id::new(self.value)
    }
}

impl From<RoleId> for OverwriteId {
    fn from(id: RoleId) -> Self {
        Id::new(id.get())
    }
}

impl From<UserId> for OverwriteId {
    fn from(id: UserId) -> Self {
        Id::new(id.get())
    }
}

/// Error when parsing an identifier from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} format")]
pub struct IdParseError {
    pub kind: &'static str,
}

impl<K: IdKind> Clone for Id<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: IdKind> Copy for Id<K> {}

impl<K: IdKind> PartialEq for Id<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<K: IdKind> Eq for Id<K> {}

impl<K: IdKind> Hash for Id<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<K: IdKind> PartialOrd for Id<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: IdKind> Ord for Id<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<K: IdKind> fmt::Debug for Id<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", K::NAME, self.value)
    }
}

impl<K: IdKind> fmt::Display for Id<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<K: IdKind> std::str::FromStr for Id<K> {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or(IdParseError { kind: K::NAME })
    }
}

// Serialize as string for JSON (JavaScript BigInt safety)
impl<K: IdKind> Serialize for Id<K> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.value.to_string())
    }
}

// Deserialize from string or non-negative number
impl<'de, K: IdKind> Deserialize<'de> for Id<K> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct IdVisitor<K>(PhantomData<fn() -> K>);

        impl<K: IdKind> Visitor<'_> for IdVisitor<K> {
            type Value = Id<K>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "a string or integer representing a {}", K::NAME)
            }

            fn visit_i64<E>(self, value: i64) -> Result<Id<K>, E>
            where
                E: de::Error,
            {
                u64::try_from(value)
                    .map(Id::new)
                    .map_err(|_| de::Error::custom("negative snowflake"))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Id<K>, E>
            where
                E: de::Error,
            {
                Ok(Id::new(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Id<K>, E>
            where
                E: de::Error,
            {
                Id::parse(value).ok_or_else(|| de::Error::custom("invalid snowflake string"))
            }
        }

        deserializer.deserialize_any(IdVisitor(PhantomData))
    }
}
