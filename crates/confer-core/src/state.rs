//! Connection and channel lifecycle states.
//!
//! ```text
//! ┌─────────┐ init ┌──────────────┐ ConnectedToServer ┌────────────────┐
//! │ Unknown │─────>│ Disconnected │──────────────────>│ ReadyToConnect │<──────────┐
//! └─────────┘      └──────────────┘                   └────────────────┘           │
//!                                                connect │      ↑ ConnectFailed    │
//!                                                        ↓      │                  │
//!                                                   ┌────────────┐                 │
//!                                                   │ Connecting │                 │
//!                                                   └────────────┘                 │
//!                                                        │ Connected               │
//!                                                        ↓                         │
//!              JoinChannelFailed / LeftChannel      ┌───────────┐  self leaves     │
//!            ┌─────────────────────────────────────>│ Connected │─────────────────>┤
//!            │                                      └───────────┘                  │
//!            │                                   join  │                           │
//!            │                                         ↓                           │
//!  ┌───────────────┐  JoinedChannel  ┌────────────────┐           self leaves      │
//!  │ JoinedChannel │<────────────────│ JoiningChannel │───────────────────────────>┤
//!  └───────────────┘                 └────────────────┘                            │
//!          │                          self leaves                                  │
//!          └───────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

/// Lifecycle state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionStatus {
    /// Engine constructed, transport not initialized.
    #[default]
    Unknown,
    /// Transport initialized, signaling server not reached yet.
    Disconnected,
    /// Signaling server reached; `connect` is allowed.
    ReadyToConnect,
    /// `connect` sent, awaiting the outcome.
    Connecting,
    /// Application connected; channel commands are allowed.
    Connected,
    /// `join_channel` sent, awaiting the outcome.
    JoiningChannel,
    /// Inside a channel; messaging and audio commands are allowed.
    JoinedChannel,
}

impl ConnectionStatus {
    /// Every state, in lifecycle order.
    pub const ALL: [Self; 7] = [
        Self::Unknown,
        Self::Disconnected,
        Self::ReadyToConnect,
        Self::Connecting,
        Self::Connected,
        Self::JoiningChannel,
        Self::JoinedChannel,
    ];

    /// Whether the application connection is established.
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected | Self::JoiningChannel | Self::JoinedChannel)
    }

    /// Whether the session is inside a channel.
    pub const fn in_channel(self) -> bool {
        matches!(self, Self::JoinedChannel)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::Disconnected => "disconnected",
            Self::ReadyToConnect => "ready-to-connect",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::JoiningChannel => "joining-channel",
            Self::JoinedChannel => "joined-channel",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connected_states() {
        let connected: Vec<_> =
            ConnectionStatus::ALL.into_iter().filter(|s| s.is_connected()).collect();
        assert_eq!(connected, [
            ConnectionStatus::Connected,
            ConnectionStatus::JoiningChannel,
            ConnectionStatus::JoinedChannel
        ]);
    }

    #[test]
    fn only_joined_is_in_channel() {
        for state in ConnectionStatus::ALL {
            assert_eq!(state.in_channel(), state == ConnectionStatus::JoinedChannel);
        }
    }
}
