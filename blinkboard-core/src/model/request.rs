use std::borrow::Cow;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

/// Shown in place of a command when the request carries none.
const ABSENT_COMMAND: &str = "undefined";

#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("request is null, expected an object")]
    Null,
}

/// A single decoded request line.
///
/// Loosely typed: `command` is kept as whatever JSON the UI sent and only
/// resolved to a name at dispatch. The producer's `timestamp` is kept for
/// diagnostics; responses are always stamped with the backend clock.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Request {
    #[serde(default, deserialize_with = "present")]
    pub command: Option<Value>,

    #[serde(default)]
    pub timestamp: Option<Value>,
}

impl Request {
    /// Builds a request from any decoded JSON value.
    ///
    /// Objects are read field by field. Arrays and scalars carry no fields
    /// and become a request without a command. Only `null` is rejected.
    pub fn from_value(value: Value) -> Result<Self, RequestError> {
        match value {
            Value::Null => Err(RequestError::Null),
            Value::Object(_) => Ok(serde_json::from_value(value)?),
            _ => Ok(Self::default()),
        }
    }

    /// Command name used for dispatch and echoed in unknown-command replies.
    ///
    /// Strings are used as-is, other JSON values as their JSON text.
    pub fn command_name(&self) -> Cow<'_, str> {
        match &self.command {
            Some(Value::String(name)) => Cow::Borrowed(name),
            Some(other) => Cow::Owned(other.to_string()),
            None => Cow::Borrowed(ABSENT_COMMAND),
        }
    }
}

// An explicit `null` is still a command value, unlike a missing field.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
