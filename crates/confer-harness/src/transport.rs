use std::sync::{Arc, Mutex, PoisonError};

use confer_client::Transport;
use confer_proto::TransportCommand;

/// Transport that records every call as a [`TransportCommand`].
///
/// Clones share the same log, so a test can keep one handle while the
/// runtime owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    log: Arc<Mutex<Vec<TransportCommand>>>,
}

impl RecordingTransport {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands received so far, in call order.
    pub fn commands(&self) -> Vec<TransportCommand> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Drain the recorded commands.
    pub fn take(&self) -> Vec<TransportCommand> {
        std::mem::take(&mut *self.log.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn record(&self, command: TransportCommand) {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).push(command);
    }
}

impl Transport for RecordingTransport {
    fn init(&mut self) {
        self.record(TransportCommand::Init);
    }

    fn set_user(&mut self, user_info: &str) {
        self.record(TransportCommand::SetUser { user_info: user_info.to_string() });
    }

    fn begin_media_stream(&mut self, video: i32, audio: i32) {
        self.record(TransportCommand::BeginMediaStream { video: video != 0, audio: audio != 0 });
    }

    fn connect(&mut self, app_key: &str) {
        self.record(TransportCommand::Connect { app_key: app_key.to_string() });
    }

    fn join_channel(&mut self, channel: &str, is_private: i32, password: &str) {
        self.record(TransportCommand::JoinChannel {
            channel: channel.to_string(),
            is_private: is_private != 0,
            password: password.to_string(),
        });
    }

    fn leave_channel(&mut self) {
        self.record(TransportCommand::LeaveChannel);
    }

    fn send_message(&mut self, text: &str) {
        self.record(TransportCommand::SendMessage { text: text.to_string() });
    }

    fn set_mute_video(&mut self, status: i32) {
        self.record(TransportCommand::SetMuteVideo { muted: status == 0 });
    }

    fn set_mute_audio(&mut self, status: i32) {
        self.record(TransportCommand::SetMuteAudio { muted: status == 0 });
    }

    fn set_audio_volume(&mut self, user_id: &str, volume: i32) {
        self.record(TransportCommand::SetAudioVolume {
            user_id: user_id.to_string(),
            volume: volume.clamp(0, 100) as u8,
        });
    }
}
