//! Session outputs.
//!
//! Every input to [`crate::Session`] returns an ordered `Vec<SessionAction>`.
//! The order is significant: the caller must dispatch commands and deliver
//! events exactly as listed, because applications observe state through
//! event order (e.g. `FrameUpdated` for a departing participant arrives
//! before its `UserDisconnected`).

use confer_proto::{ParticipantId, TransportCommand};

use crate::roster::{ChatMessage, ParticipantInfo};

/// Event delivered to the application.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Application connection established.
    Connected,
    /// Application connection failed.
    ConnectFailed {
        /// Reason reported by the transport
        reason: String,
    },
    /// Local participant left the service.
    Disconnected,
    /// Channel joined.
    ChannelJoined,
    /// Channel left.
    ChannelLeft,
    /// Channel join failed.
    ChannelJoinFailed {
        /// Reason reported by the transport
        reason: String,
    },
    /// Local media streaming started.
    StreamBegan,
    /// Local media streaming failed to start.
    StreamFailed {
        /// Reason reported by the transport
        reason: String,
    },
    /// Chat message recorded against its author.
    MessageReceived(ChatMessage),
    /// Roster changed; carries the full membership in join order.
    RosterUpdated(Vec<ParticipantInfo>),
    /// Participant added to the roster.
    UserConnected(ParticipantInfo),
    /// Participant removed from the roster.
    UserDisconnected(ParticipantInfo),
    /// A participant's frame buffer was allocated.
    FrameInitialized {
        /// Buffer owner
        user_id: ParticipantId,
    },
    /// A participant's frame buffer content changed or was released.
    FrameUpdated {
        /// Buffer owner
        user_id: ParticipantId,
    },
}

/// Output of a session input, in execution order.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Hand a command to the transport.
    Send(TransportCommand),
    /// Deliver an event to the application.
    Emit(SessionEvent),
}

impl SessionAction {
    /// Event carried by this action, if any.
    pub fn as_event(&self) -> Option<&SessionEvent> {
        match self {
            Self::Emit(event) => Some(event),
            Self::Send(_) => None,
        }
    }

    /// Command carried by this action, if any.
    pub fn as_command(&self) -> Option<&TransportCommand> {
        match self {
            Self::Send(command) => Some(command),
            Self::Emit(_) => None,
        }
    }
}
