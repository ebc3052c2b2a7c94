//! Transport command surface.
//!
//! The transport (signaling, media negotiation, sockets) lives outside this
//! crate. It exposes the imperative commands below and reports outcomes
//! asynchronously through an [`crate::InboundSender`]. Integer arguments
//! follow the transport's native conventions: booleans are `0`/`1`, mute
//! status is "track enabled", volume is a percentage.

use confer_proto::TransportCommand;

/// Imperative commands a transport accepts.
///
/// Every call is fire-and-forget. Failures come back as notifications.
pub trait Transport: Send {
    /// Initialize and register notification callbacks.
    fn init(&mut self);

    /// Publish local user metadata as JSON.
    fn set_user(&mut self, user_info: &str);

    /// Start local media capture.
    fn begin_media_stream(&mut self, video: i32, audio: i32);

    /// Connect the application.
    fn connect(&mut self, app_key: &str);

    /// Join a channel.
    fn join_channel(&mut self, channel: &str, is_private: i32, password: &str);

    /// Leave the current channel.
    fn leave_channel(&mut self);

    /// Send a chat message.
    fn send_message(&mut self, text: &str);

    /// Enable (`1`) or disable (`0`) local video.
    fn set_mute_video(&mut self, status: i32);

    /// Enable (`1`) or disable (`0`) local audio.
    fn set_mute_audio(&mut self, status: i32);

    /// Set a remote participant's volume in `0..=100`.
    fn set_audio_volume(&mut self, user_id: &str, volume: i32);

    /// Route a session command to the matching method.
    fn dispatch(&mut self, command: &TransportCommand) {
        match command {
            TransportCommand::Init => self.init(),
            TransportCommand::SetUser { user_info } => self.set_user(user_info),
            TransportCommand::BeginMediaStream { video, audio } => self.begin_media_stream(
                TransportCommand::flag(*video),
                TransportCommand::flag(*audio),
            ),
            TransportCommand::Connect { app_key } => self.connect(app_key),
            TransportCommand::JoinChannel { channel, is_private, password } => {
                self.join_channel(channel, TransportCommand::flag(*is_private), password);
            },
            TransportCommand::LeaveChannel => self.leave_channel(),
            TransportCommand::SendMessage { text } => self.send_message(text),
            TransportCommand::SetMuteVideo { muted } => {
                self.set_mute_video(TransportCommand::mute_status(*muted));
            },
            TransportCommand::SetMuteAudio { muted } => {
                self.set_mute_audio(TransportCommand::mute_status(*muted));
            },
            TransportCommand::SetAudioVolume { user_id, volume } => {
                self.set_audio_volume(user_id, i32::from(*volume));
            },
        }
    }
}

/// Transport that accepts every command and does nothing.
///
/// Used on platforms without a media backend. No notifications ever arrive,
/// so a session driven by it stays `Disconnected` after initialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTransport;

impl Transport for NullTransport {
    fn init(&mut self) {}

    fn set_user(&mut self, _user_info: &str) {}

    fn begin_media_stream(&mut self, _video: i32, _audio: i32) {}

    fn connect(&mut self, _app_key: &str) {}

    fn join_channel(&mut self, _channel: &str, _is_private: i32, _password: &str) {}

    fn leave_channel(&mut self) {}

    fn send_message(&mut self, _text: &str) {}

    fn set_mute_video(&mut self, _status: i32) {}

    fn set_mute_audio(&mut self, _status: i32) {}

    fn set_audio_volume(&mut self, _user_id: &str, _volume: i32) {}
}
