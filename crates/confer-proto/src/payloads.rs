//! Typed payloads carried inside notification `data` fields.
//!
//! The wire structs mirror the transport's camelCase JSON and stay private to
//! the crate. Decoding converts them into the public types here, resolving
//! epoch-millisecond timestamps and absent user info on the way.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{DecodeError, Result};

/// Transport-assigned participant identifier.
///
/// Stable for the lifetime of a session and unique among connected users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Wrap a transport identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as sent by the transport.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Display metadata for a participant.
///
/// `name` is the only field the engine interprets. Anything else the
/// application attached via `set_user` round-trips through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Application-defined fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserInfo {
    /// User info with just a display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), extra: serde_json::Map::new() }
    }
}

/// Chat message as delivered by the transport, before roster resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Author's participant id.
    pub author_id: ParticipantId,
    /// Message text.
    pub text: String,
    /// Server-side creation time.
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MessageData {
    user_id: String,
    #[serde(default)]
    message: String,
    created_at: i64,
}

impl MessageData {
    pub(crate) fn into_message(self) -> Result<IncomingMessage> {
        let created_at = DateTime::from_timestamp_millis(self.created_at)
            .ok_or(DecodeError::Timestamp(self.created_at))?;

        Ok(IncomingMessage {
            author_id: ParticipantId(self.user_id),
            text: self.message,
            created_at,
        })
    }
}

#[derive(Deserialize)]
pub(crate) struct UserConnectedData {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) main: bool,
    #[serde(default)]
    pub(crate) user: Option<UserInfo>,
}

#[derive(Deserialize)]
pub(crate) struct UserDisconnectedData {
    pub(crate) id: String,
}

#[derive(Deserialize)]
pub(crate) struct ChannelStateData {
    #[serde(default)]
    pub(crate) messages: Option<Vec<MessageData>>,
}
