//! Structured notification decoding.
//!
//! The transport reports every state change as a JSON envelope:
//!
//! ```json
//! { "status": true, "type": "UserConnected", "data": "{\"id\":\"u1\",\"main\":true}" }
//! ```
//!
//! `data` is itself a string. For most kinds it is nested JSON, for the
//! failure kinds it is a human-readable reason.
//!
//! # Invariants
//!
//! - `status = false` never produces a [`Notification`], whatever `type` and
//!   `data` contain.
//! - An unrecognized `type` never produces a [`Notification`].
//! - Each [`NotificationKind`] maps to exactly one [`Notification`] variant.

use std::fmt;

use serde::Deserialize;

use crate::{
    errors::{DecodeError, Result},
    payloads::{
        ChannelStateData, IncomingMessage, MessageData, ParticipantId, UserConnectedData,
        UserDisconnectedData, UserInfo,
    },
};

/// Outer JSON envelope of a structured notification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Envelope {
    /// Whether the transport considers this a successful notification.
    pub status: bool,

    /// Event kind name.
    #[serde(rename = "type")]
    pub kind: String,

    /// Kind-specific payload. Absent or `null` is treated as empty.
    #[serde(default)]
    data: Option<String>,
}

impl Envelope {
    /// Parse the envelope from raw JSON.
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| DecodeError::Envelope(e.to_string()))
    }

    /// Payload string, empty when absent.
    pub fn data(&self) -> &str {
        self.data.as_deref().unwrap_or_default()
    }
}

/// Closed set of structured notification kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Transport reached the signaling server.
    ConnectedToServer,
    /// Application connection accepted.
    Connected,
    /// Application connection rejected.
    ConnectFailed,
    /// A user joined the session.
    UserConnected,
    /// A user left the session.
    UserDisconnected,
    /// Live chat message.
    MessageReceived,
    /// Channel join completed.
    JoinedChannel,
    /// Channel left.
    LeftChannel,
    /// Channel join rejected.
    JoinChannelFailed,
    /// Bulk channel snapshot (chat history).
    ChannelStateReceived,
    /// Local media stream started.
    BeginMediaStreamSuccess,
    /// Local media stream could not start.
    BeginMediaStreamFailed,
}

impl NotificationKind {
    /// Every kind, in wire declaration order.
    pub const ALL: [Self; 12] = [
        Self::MessageReceived,
        Self::Connected,
        Self::ConnectFailed,
        Self::UserConnected,
        Self::UserDisconnected,
        Self::JoinedChannel,
        Self::LeftChannel,
        Self::JoinChannelFailed,
        Self::ChannelStateReceived,
        Self::BeginMediaStreamSuccess,
        Self::BeginMediaStreamFailed,
        Self::ConnectedToServer,
    ];

    /// Look up a kind by its wire name. Names are case-sensitive.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Wire name of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConnectedToServer => "ConnectedToServer",
            Self::Connected => "Connected",
            Self::ConnectFailed => "ConnectFailed",
            Self::UserConnected => "UserConnected",
            Self::UserDisconnected => "UserDisconnected",
            Self::MessageReceived => "MessageReceived",
            Self::JoinedChannel => "JoinedChannel",
            Self::LeftChannel => "LeftChannel",
            Self::JoinChannelFailed => "JoinChannelFailed",
            Self::ChannelStateReceived => "ChannelStateReceived",
            Self::BeginMediaStreamSuccess => "BeginMediaStreamSuccess",
            Self::BeginMediaStreamFailed => "BeginMediaStreamFailed",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded structured notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Transport reached the signaling server.
    ConnectedToServer,

    /// Application connection accepted.
    Connected,

    /// Application connection rejected.
    ConnectFailed {
        /// Transport-supplied reason.
        reason: String,
    },

    /// A user joined the session.
    UserConnected {
        /// Transport-assigned id.
        id: ParticipantId,
        /// This user is the local session's own identity.
        is_self: bool,
        /// Display metadata.
        info: UserInfo,
    },

    /// A user left the session.
    UserDisconnected {
        /// Id of the departing user.
        id: ParticipantId,
    },

    /// Live chat message.
    MessageReceived(IncomingMessage),

    /// Channel join completed.
    JoinedChannel,

    /// Channel left.
    LeftChannel,

    /// Channel join rejected.
    JoinChannelFailed {
        /// Transport-supplied reason.
        reason: String,
    },

    /// Bulk channel snapshot.
    ///
    /// Messages are in payload order; callers sort before applying.
    ChannelStateReceived {
        /// Chat history contained in the snapshot.
        messages: Vec<IncomingMessage>,
    },

    /// Local media stream started.
    StreamBegan,

    /// Local media stream could not start.
    StreamFailed {
        /// Transport-supplied reason.
        reason: String,
    },
}

impl Notification {
    /// Kind this notification was decoded from.
    pub const fn kind(&self) -> NotificationKind {
        match self {
            Self::ConnectedToServer => NotificationKind::ConnectedToServer,
            Self::Connected => NotificationKind::Connected,
            Self::ConnectFailed { .. } => NotificationKind::ConnectFailed,
            Self::UserConnected { .. } => NotificationKind::UserConnected,
            Self::UserDisconnected { .. } => NotificationKind::UserDisconnected,
            Self::MessageReceived(_) => NotificationKind::MessageReceived,
            Self::JoinedChannel => NotificationKind::JoinedChannel,
            Self::LeftChannel => NotificationKind::LeftChannel,
            Self::JoinChannelFailed { .. } => NotificationKind::JoinChannelFailed,
            Self::ChannelStateReceived { .. } => NotificationKind::ChannelStateReceived,
            Self::StreamBegan => NotificationKind::BeginMediaStreamSuccess,
            Self::StreamFailed { .. } => NotificationKind::BeginMediaStreamFailed,
        }
    }

    /// Decode the payload of a successful envelope of the given kind.
    pub fn decode(kind: NotificationKind, data: &str) -> Result<Self> {
        let name = kind.as_str();
        let notification = match kind {
            NotificationKind::ConnectedToServer => Self::ConnectedToServer,
            NotificationKind::Connected => Self::Connected,
            NotificationKind::JoinedChannel => Self::JoinedChannel,
            NotificationKind::LeftChannel => Self::LeftChannel,
            NotificationKind::BeginMediaStreamSuccess => Self::StreamBegan,
            NotificationKind::ConnectFailed => Self::ConnectFailed { reason: data.to_string() },
            NotificationKind::JoinChannelFailed => {
                Self::JoinChannelFailed { reason: data.to_string() }
            },
            NotificationKind::BeginMediaStreamFailed => {
                Self::StreamFailed { reason: data.to_string() }
            },
            NotificationKind::MessageReceived => {
                let message: MessageData = parse_data(name, data)?;
                Self::MessageReceived(message.into_message()?)
            },
            NotificationKind::UserConnected => {
                let user: UserConnectedData = parse_data(name, data)?;
                Self::UserConnected {
                    id: ParticipantId::new(user.id),
                    is_self: user.main,
                    info: user.user.unwrap_or_default(),
                }
            },
            NotificationKind::UserDisconnected => {
                let user: UserDisconnectedData = parse_data(name, data)?;
                Self::UserDisconnected { id: ParticipantId::new(user.id) }
            },
            NotificationKind::ChannelStateReceived => {
                let state: ChannelStateData = parse_data(name, data)?;
                let messages = state
                    .messages
                    .unwrap_or_default()
                    .into_iter()
                    .map(MessageData::into_message)
                    .collect::<Result<Vec<_>>>()?;
                Self::ChannelStateReceived { messages }
            },
        };

        Ok(notification)
    }
}

fn parse_data<'a, T: Deserialize<'a>>(kind: &'static str, data: &'a str) -> Result<T> {
    serde_json::from_str(data).map_err(|e| DecodeError::payload(kind, e))
}

/// Outcome of decoding a structured notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A typed notification to apply.
    Event(Notification),

    /// Envelope carried `status = false` and is discarded.
    Rejected {
        /// Raw `type` field.
        kind: String,
        /// Raw `data` field.
        data: String,
    },

    /// Envelope `type` is not part of the known kind set.
    Unrecognized {
        /// Raw `type` field.
        kind: String,
    },
}

/// Decode a structured notification from its raw JSON.
///
/// # Errors
///
/// - [`DecodeError::Envelope`] if the outer JSON is malformed
/// - [`DecodeError::Payload`] if `data` does not match its kind
/// - [`DecodeError::Timestamp`] if a message timestamp is out of range
pub fn decode_notification(json: &str) -> Result<Decoded> {
    let envelope = Envelope::parse(json)?;

    if !envelope.status {
        let data = envelope.data().to_string();
        return Ok(Decoded::Rejected { kind: envelope.kind, data });
    }

    let Some(kind) = NotificationKind::parse(&envelope.kind) else {
        return Ok(Decoded::Unrecognized { kind: envelope.kind });
    };

    Notification::decode(kind, envelope.data()).map(Decoded::Event)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(status: bool, kind: &str, data: &str) -> String {
        serde_json::json!({ "status": status, "type": kind, "data": data }).to_string()
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in NotificationKind::ALL {
            assert_eq!(NotificationKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NotificationKind::parse("connected"), None);
    }

    #[test]
    fn decodes_user_connected() {
        let data = r#"{"id":"u1","main":true,"user":{"name":"ada"}}"#;
        let decoded = decode_notification(&envelope(true, "UserConnected", data)).unwrap();

        assert_eq!(
            decoded,
            Decoded::Event(Notification::UserConnected {
                id: ParticipantId::new("u1"),
                is_self: true,
                info: UserInfo::named("ada"),
            })
        );
    }

    #[test]
    fn missing_user_info_defaults() {
        let decoded =
            decode_notification(&envelope(true, "UserConnected", r#"{"id":"u2"}"#)).unwrap();

        let Decoded::Event(Notification::UserConnected { is_self, info, .. }) = decoded else {
            panic!("expected UserConnected, got {decoded:?}");
        };
        assert!(!is_self);
        assert_eq!(info, UserInfo::default());
    }

    #[test]
    fn failure_kinds_carry_reason_text() {
        let decoded = decode_notification(&envelope(true, "ConnectFailed", "bad key")).unwrap();
        assert_eq!(
            decoded,
            Decoded::Event(Notification::ConnectFailed { reason: "bad key".to_string() })
        );
    }

    #[test]
    fn null_data_is_empty() {
        let json = r#"{"status":true,"type":"Connected","data":null}"#;
        assert_eq!(decode_notification(json).unwrap(), Decoded::Event(Notification::Connected));

        let json = r#"{"status":true,"type":"JoinChannelFailed"}"#;
        assert_eq!(
            decode_notification(json).unwrap(),
            Decoded::Event(Notification::JoinChannelFailed { reason: String::new() })
        );
    }

    #[test]
    fn status_false_is_rejected() {
        let decoded = decode_notification(&envelope(false, "Connected", "")).unwrap();
        assert!(matches!(decoded, Decoded::Rejected { ref kind, .. } if kind == "Connected"));
    }

    #[test]
    fn unknown_kind_is_unrecognized() {
        let decoded = decode_notification(&envelope(true, "Teleported", "{}")).unwrap();
        assert_eq!(decoded, Decoded::Unrecognized { kind: "Teleported".to_string() });
    }

    #[test]
    fn malformed_envelope_is_an_error() {
        assert!(matches!(decode_notification("{not json"), Err(DecodeError::Envelope(_))));
        assert!(matches!(decode_notification(r#"{"type":"Connected"}"#), Err(DecodeError::Envelope(_))));
    }

    #[test]
    fn malformed_payload_is_an_error() {
        let result = decode_notification(&envelope(true, "UserDisconnected", "{}"));
        assert!(matches!(result, Err(DecodeError::Payload { kind: "UserDisconnected", .. })));
    }

    #[test]
    fn channel_state_keeps_payload_order() {
        let data = r#"{"messages":[
            {"userId":"a","message":"third","createdAt":300},
            {"userId":"a","message":"first","createdAt":100}
        ]}"#;
        let decoded = decode_notification(&envelope(true, "ChannelStateReceived", data)).unwrap();

        let Decoded::Event(Notification::ChannelStateReceived { messages }) = decoded else {
            panic!("expected ChannelStateReceived, got {decoded:?}");
        };
        let texts: Vec<_> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["third", "first"]);
    }

    #[test]
    fn channel_state_without_messages_is_empty() {
        let decoded =
            decode_notification(&envelope(true, "ChannelStateReceived", r#"{"messages":null}"#))
                .unwrap();
        assert_eq!(
            decoded,
            Decoded::Event(Notification::ChannelStateReceived { messages: Vec::new() })
        );
    }

    #[test]
    fn decoded_kind_matches_envelope_kind() {
        let decoded = decode_notification(&envelope(true, "BeginMediaStreamFailed", "denied"))
            .unwrap();
        let Decoded::Event(notification) = decoded else {
            panic!("expected event, got {decoded:?}");
        };
        assert_eq!(notification.kind(), NotificationKind::BeginMediaStreamFailed);
    }
}
