//! Lenient field readers for gateway payloads
//!
//! Required readers fail with a [`DecodeError`]; optional readers turn a
//! missing or mistyped field into `None`.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{DecodeError, DecodeResult};
use crate::value_objects::{Id, IdKind, Permissions};

pub(crate) type Object = Map<String, Value>;

pub(crate) fn object(value: &Value) -> DecodeResult<&Object> {
    value.as_object().ok_or(DecodeError::NotAnObject)
}

/// Present and not JSON `null`
pub(crate) fn field<'a>(obj: &'a Object, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

pub(crate) fn required<'a>(obj: &'a Object, key: &'static str) -> DecodeResult<&'a Value> {
    field(obj, key).ok_or(DecodeError::MissingField(key))
}

pub(crate) fn required_id<K: IdKind>(obj: &Object, key: &'static str) -> DecodeResult<Id<K>> {
    id_value(required(obj, key)?).ok_or(DecodeError::invalid(key, "snowflake string"))
}

pub(crate) fn optional_id<K: IdKind>(obj: &Object, key: &str) -> Option<Id<K>> {
    field(obj, key).and_then(id_value)
}

/// Snowflakes arrive as strings; plain integers are tolerated
pub(crate) fn id_value<K: IdKind>(value: &Value) -> Option<Id<K>> {
    match value {
        Value::String(s) => Id::parse(s),
        Value::Number(n) => n.as_u64().map(Id::new),
        _ => None,
    }
}

pub(crate) fn permissions_value(value: &Value) -> Option<Permissions> {
    Permissions::deserialize(value).ok()
}

pub(crate) fn optional_str(obj: &Object, key: &str) -> Option<String> {
    field(obj, key).and_then(Value::as_str).map(str::to_owned)
}

pub(crate) fn optional_bool(obj: &Object, key: &str) -> Option<bool> {
    field(obj, key).and_then(Value::as_bool)
}

pub(crate) fn optional_u32(obj: &Object, key: &str) -> Option<u32> {
    field(obj, key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

pub(crate) fn optional_i32(obj: &Object, key: &str) -> Option<i32> {
    field(obj, key)
        .and_then(Value::as_i64)
        .and_then(|n| i32::try_from(n).ok())
}

/// ISO-8601 / RFC 3339 timestamp
pub(crate) fn optional_timestamp(obj: &Object, key: &str) -> Option<DateTime<Utc>> {
    field(obj, key)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

pub(crate) fn optional_array<'a>(obj: &'a Object, key: &str) -> Option<&'a Vec<Value>> {
    field(obj, key).and_then(Value::as_array)
}
