//! Session state machine.
//!
//! [`Session`] owns the connection state, the roster, and the configuration.
//! Application commands are accepted only in the states listed below; in any
//! other state they are silent no-ops and produce no actions.
//!
//! | command                | required state                     |
//! |------------------------|------------------------------------|
//! | `connect`              | `ReadyToConnect`                   |
//! | `join_channel`         | `Connected`                        |
//! | `leave_channel`        | `JoinedChannel`                    |
//! | `send_message`         | `JoinedChannel`                    |
//! | `set_mute_audio/video` | `JoinedChannel`                    |
//! | `set_audio_volume`     | `JoinedChannel`                    |
//! | `begin_media_stream`   | `Connected`                        |
//! | `set_user`             | any                                |
//!
//! Lifecycle notifications are applied only in the state that expects them
//! (e.g. `Connected` only while `Connecting`); out-of-order ones are dropped.
//! Roster, message, and media-stream notifications apply in any state.

use std::sync::Arc;

use confer_proto::{
    Decoded, FrameMetadata, IncomingMessage, Notification, ParticipantId, RawFrame,
    TransportCommand, UserInfo, decode_frame_metadata, decode_notification,
};

use crate::{
    config::SessionConfig,
    error::SessionError,
    event::{SessionAction, SessionEvent},
    roster::{Participant, Roster},
    spatial::{self, PositionProvider},
    state::ConnectionStatus,
};

/// Channel joined when the caller does not name one.
pub const DEFAULT_CHANNEL: &str = "default";

/// Log through `tracing` only when the session has logging enabled.
macro_rules! diag {
    ($session:expr, $level:ident, $($arg:tt)+) => {
        if $session.config.logging {
            tracing::$level!($($arg)+);
        }
    };
}

/// Arguments of a `join_channel` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRequest {
    /// Channel name.
    pub channel: String,
    /// Channel is private.
    pub is_private: bool,
    /// Channel password. `None` is sent as an empty string.
    pub password: Option<String>,
}

impl ChannelRequest {
    /// Request for a public channel.
    pub fn named(channel: impl Into<String>) -> Self {
        Self { channel: channel.into(), ..Self::default() }
    }
}

impl Default for ChannelRequest {
    fn default() -> Self {
        Self { channel: DEFAULT_CHANNEL.to_string(), is_private: false, password: None }
    }
}

/// Client-side conferencing session.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    state: ConnectionStatus,
    roster: Roster,
}

impl Session {
    /// Create a session in the [`ConnectionStatus::Unknown`] state.
    ///
    /// Call [`Session::initialize`] before anything else.
    pub fn new(config: SessionConfig) -> Self {
        Self { config, state: ConnectionStatus::Unknown, roster: Roster::new() }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionStatus {
        self.state
    }

    /// Active configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Participant roster.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Look up a participant.
    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.roster.get(id)
    }

    /// The local participant, once known.
    pub fn self_participant(&self) -> Option<&Participant> {
        self.roster.self_participant()
    }

    /// Participants in join order.
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.roster.iter()
    }

    /// Initialize the transport. Only the first call has an effect.
    pub fn initialize(&mut self) -> Vec<SessionAction> {
        if self.state != ConnectionStatus::Unknown {
            return Vec::new();
        }

        self.state = ConnectionStatus::Disconnected;
        vec![SessionAction::Send(TransportCommand::Init)]
    }

    /// Publish the local user's display metadata. Allowed in any state.
    pub fn set_user(&self, info: &UserInfo) -> Vec<SessionAction> {
        match serde_json::to_string(info) {
            Ok(user_info) => vec![SessionAction::Send(TransportCommand::SetUser { user_info })],
            Err(error) => {
                diag!(self, warn, %error, "failed to serialize user info");
                Vec::new()
            },
        }
    }

    /// Connect with the configured app key.
    pub fn connect(&mut self) -> Vec<SessionAction> {
        let actions = self.gated(ConnectionStatus::ReadyToConnect, "connect", || {
            TransportCommand::Connect { app_key: self.config.app_key.clone() }
        });
        if !actions.is_empty() {
            self.state = ConnectionStatus::Connecting;
        }
        actions
    }

    /// Join a channel.
    pub fn join_channel(&mut self, request: ChannelRequest) -> Vec<SessionAction> {
        let actions = self.gated(ConnectionStatus::Connected, "join_channel", || {
            TransportCommand::JoinChannel {
                channel: request.channel,
                is_private: request.is_private,
                password: request.password.unwrap_or_default(),
            }
        });
        if !actions.is_empty() {
            self.state = ConnectionStatus::JoiningChannel;
        }
        actions
    }

    /// Leave the current channel. State changes when the transport confirms.
    pub fn leave_channel(&self) -> Vec<SessionAction> {
        self.gated(ConnectionStatus::JoinedChannel, "leave_channel", || {
            TransportCommand::LeaveChannel
        })
    }

    /// Send a chat message to the current channel.
    pub fn send_message(&self, text: impl Into<String>) -> Vec<SessionAction> {
        self.gated(ConnectionStatus::JoinedChannel, "send_message", || {
            TransportCommand::SendMessage { text: text.into() }
        })
    }

    /// Mute or unmute local audio.
    pub fn set_mute_audio(&self, muted: bool) -> Vec<SessionAction> {
        self.gated(ConnectionStatus::JoinedChannel, "set_mute_audio", || {
            TransportCommand::SetMuteAudio { muted }
        })
    }

    /// Mute or unmute local video.
    pub fn set_mute_video(&self, muted: bool) -> Vec<SessionAction> {
        self.gated(ConnectionStatus::JoinedChannel, "set_mute_video", || {
            TransportCommand::SetMuteVideo { muted }
        })
    }

    /// Set a remote participant's playback volume.
    ///
    /// `volume` is clamped to `[0, 1]` and sent as a truncated percentage.
    pub fn set_audio_volume(&self, user_id: &ParticipantId, volume: f32) -> Vec<SessionAction> {
        self.gated(ConnectionStatus::JoinedChannel, "set_audio_volume", || {
            TransportCommand::SetAudioVolume {
                user_id: user_id.as_str().to_string(),
                volume: volume_percent(volume),
            }
        })
    }

    /// Start publishing local media. Does not change state.
    pub fn begin_media_stream(&self, video: bool, audio: bool) -> Vec<SessionAction> {
        self.gated(ConnectionStatus::Connected, "begin_media_stream", || {
            TransportCommand::BeginMediaStream { video, audio }
        })
    }

    /// Attach a position source to a participant.
    pub fn attach_position(
        &mut self,
        id: &ParticipantId,
        provider: Arc<dyn PositionProvider>,
    ) -> Result<(), SessionError> {
        let participant = self
            .roster
            .get_mut(id)
            .ok_or_else(|| SessionError::ParticipantNotFound { id: id.clone() })?;
        participant.set_position(Some(provider));
        Ok(())
    }

    /// Detach a participant's position source.
    pub fn detach_position(&mut self, id: &ParticipantId) -> Result<(), SessionError> {
        let participant = self
            .roster
            .get_mut(id)
            .ok_or_else(|| SessionError::ParticipantNotFound { id: id.clone() })?;
        participant.set_position(None);
        Ok(())
    }

    /// Recompute the spatial volume of `target` relative to the local user.
    ///
    /// No-op unless in a channel, the local participant is known, `target`
    /// is a different participant, and both have a position source.
    pub fn update_spatial(&self, target: &ParticipantId) -> Vec<SessionAction> {
        if self.state != ConnectionStatus::JoinedChannel || self.roster.is_self(target) {
            return Vec::new();
        }

        let Some(me) = self.roster.self_participant() else {
            return Vec::new();
        };
        let Some(other) = self.roster.get(target) else {
            return Vec::new();
        };
        let (Some(source), Some(destination)) = (me.position(), other.position()) else {
            return Vec::new();
        };

        let settings = &self.config.spatial;
        let gain = spatial::volume(
            source,
            destination,
            settings.radius,
            settings.minimal_hear_radius,
            &settings.curve,
        );
        self.set_audio_volume(target, gain)
    }

    /// Decode and apply a JSON notification from the transport.
    pub fn handle_raw_notification(&mut self, json: &str) -> Vec<SessionAction> {
        diag!(self, debug, notification = json, "transport notification");

        match decode_notification(json) {
            Ok(Decoded::Event(notification)) => self.handle_notification(notification),
            Ok(Decoded::Rejected { kind, data }) => {
                diag!(self, warn, %kind, %data, "transport reported failure status");
                Vec::new()
            },
            Ok(Decoded::Unrecognized { kind }) => {
                diag!(self, warn, %kind, "unrecognized notification kind");
                Vec::new()
            },
            Err(error) => {
                diag!(self, warn, %error, "dropping undecodable notification");
                Vec::new()
            },
        }
    }

    /// Apply a decoded notification.
    pub fn handle_notification(&mut self, notification: Notification) -> Vec<SessionAction> {
        use ConnectionStatus as S;

        let kind = notification.kind();
        let state = self.state;

        match notification {
            Notification::ConnectedToServer if matches!(state, S::Unknown | S::Disconnected) => {
                self.state = S::ReadyToConnect;
                if self.config.auto_connect { self.connect() } else { Vec::new() }
            },
            Notification::Connected if state == S::Connecting => {
                self.transition(S::Connected, SessionEvent::Connected)
            },
            Notification::ConnectFailed { reason } if state == S::Connecting => {
                self.transition(S::ReadyToConnect, SessionEvent::ConnectFailed { reason })
            },
            Notification::JoinedChannel if state == S::JoiningChannel => {
                self.transition(S::JoinedChannel, SessionEvent::ChannelJoined)
            },
            Notification::JoinChannelFailed { reason } if state == S::JoiningChannel => {
                self.transition(S::Connected, SessionEvent::ChannelJoinFailed { reason })
            },
            Notification::LeftChannel if state == S::JoinedChannel => {
                self.transition(S::Connected, SessionEvent::ChannelLeft)
            },
            Notification::StreamBegan => emit(SessionEvent::StreamBegan),
            Notification::StreamFailed { reason } => emit(SessionEvent::StreamFailed { reason }),
            Notification::UserConnected { id, is_self, info } => {
                match self.roster.add(id, info, is_self) {
                    Ok(events) => events.into_iter().map(SessionAction::Emit).collect(),
                    Err(error) => {
                        diag!(self, warn, %error, "dropping UserConnected");
                        Vec::new()
                    },
                }
            },
            Notification::UserDisconnected { id } => self.disconnect_user(&id),
            Notification::MessageReceived(message) => self.post(message).into_iter().collect(),
            Notification::ChannelStateReceived { mut messages } => {
                messages.sort_by_key(|m| m.created_at);
                messages.into_iter().filter_map(|m| self.post(m)).collect()
            },
            _ => {
                diag!(self, warn, %kind, %state, "dropping out-of-order notification");
                Vec::new()
            },
        }
    }

    /// Decode frame metadata and apply the frame.
    pub fn handle_raw_frame(&mut self, metadata: &str, frame: RawFrame) -> Vec<SessionAction> {
        match decode_frame_metadata(metadata) {
            Ok(metadata) => self.handle_frame(&metadata, frame),
            Err(error) => {
                diag!(self, warn, %error, "dropping frame with bad metadata");
                Vec::new()
            },
        }
    }

    /// Copy a video frame into its participant's buffer.
    ///
    /// The frame is consumed on every path, which releases the transport's
    /// buffer before this returns.
    pub fn handle_frame(&mut self, metadata: &FrameMetadata, frame: RawFrame) -> Vec<SessionAction> {
        let row_order = self.config.video.row_order;
        let result = match self.roster.get_mut(&metadata.user_id) {
            Some(participant) => participant.video_mut().apply(metadata, frame, row_order),
            None => Err(SessionError::ParticipantNotFound { id: metadata.user_id.clone() }),
        };

        match result {
            Ok(update) => {
                let user_id = metadata.user_id.clone();
                let mut actions = Vec::with_capacity(2);
                if update.initialized {
                    actions.push(SessionAction::Emit(SessionEvent::FrameInitialized {
                        user_id: user_id.clone(),
                    }));
                }
                actions.push(SessionAction::Emit(SessionEvent::FrameUpdated { user_id }));
                actions
            },
            Err(error) => {
                diag!(self, warn, %error, "dropping video frame");
                Vec::new()
            },
        }
    }

    fn gated(
        &self,
        required: ConnectionStatus,
        command: &'static str,
        build: impl FnOnce() -> TransportCommand,
    ) -> Vec<SessionAction> {
        if self.state != required {
            diag!(self, debug, command, state = %self.state, "command ignored");
            return Vec::new();
        }

        vec![SessionAction::Send(build())]
    }

    fn transition(&mut self, next: ConnectionStatus, event: SessionEvent) -> Vec<SessionAction> {
        self.state = next;
        emit(event)
    }

    fn post(&mut self, message: IncomingMessage) -> Option<SessionAction> {
        match self.roster.post(message) {
            Ok(event) => Some(SessionAction::Emit(event)),
            Err(error) => {
                diag!(self, warn, %error, "dropping chat message");
                None
            },
        }
    }

    fn disconnect_user(&mut self, id: &ParticipantId) -> Vec<SessionAction> {
        if !self.roster.contains(id) {
            diag!(self, warn, %id, "UserDisconnected for unknown participant");
            return Vec::new();
        }

        let mut actions = Vec::new();
        if self.roster.is_self(id) {
            if self.state == ConnectionStatus::JoiningChannel {
                actions.push(SessionAction::Emit(SessionEvent::ChannelLeft));
            }
            self.state = ConnectionStatus::ReadyToConnect;
        }

        match self.roster.remove(id) {
            Ok(events) => actions.extend(events.into_iter().map(SessionAction::Emit)),
            Err(error) => diag!(self, warn, %error, "roster removal failed"),
        }

        if self.state == ConnectionStatus::ReadyToConnect {
            actions.push(SessionAction::Emit(SessionEvent::Disconnected));
        }
        actions
    }
}

fn emit(event: SessionEvent) -> Vec<SessionAction> {
    vec![SessionAction::Emit(event)]
}

/// Clamp a gain to `[0, 1]` and convert it to a truncated percentage.
fn volume_percent(volume: f32) -> u8 {
    (volume.clamp(0.0, 1.0) * 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_is_truncated_percentage() {
        assert_eq!(volume_percent(0.999), 99);
        assert_eq!(volume_percent(0.5), 50);
        assert_eq!(volume_percent(-0.2), 0);
        assert_eq!(volume_percent(7.0), 100);
        assert_eq!(volume_percent(f32::NAN), 0);
    }

    #[test]
    fn password_defaults_to_empty() {
        let mut session = Session::new(SessionConfig::default());
        session.state = ConnectionStatus::Connected;

        let actions = session.join_channel(ChannelRequest {
            channel: "vip".into(),
            is_private: true,
            password: None,
        });

        assert_eq!(actions, [SessionAction::Send(TransportCommand::JoinChannel {
            channel: "vip".into(),
            is_private: true,
            password: String::new(),
        })]);
    }

    #[test]
    fn disabled_logging_still_drops_bad_input() {
        let mut session = Session::new(SessionConfig { logging: false, ..SessionConfig::default() });
        assert!(session.handle_raw_notification("{}").is_empty());
        assert!(session.handle_raw_frame("[]", RawFrame::new(vec![1u8])).is_empty());
    }
}
