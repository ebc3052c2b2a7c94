//! Transport that logs every command.

use confer_client::Transport;

/// Transport that logs commands instead of performing them.
#[derive(Debug, Default)]
pub struct LoggingTransport {
    commands: usize,
}

impl LoggingTransport {
    /// New transport with no commands seen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commands received.
    pub fn command_count(&self) -> usize {
        self.commands
    }
}

impl Transport for LoggingTransport {
    fn init(&mut self) {
        self.commands += 1;
        tracing::info!("transport init");
    }

    fn set_user(&mut self, user_info: &str) {
        self.commands += 1;
        tracing::info!(user_info, "transport set_user");
    }

    fn begin_media_stream(&mut self, video: i32, audio: i32) {
        self.commands += 1;
        tracing::info!(video, audio, "transport begin_media_stream");
    }

    fn connect(&mut self, app_key: &str) {
        self.commands += 1;
        tracing::info!(app_key_len = app_key.len(), "transport connect");
    }

    fn join_channel(&mut self, channel: &str, is_private: i32, password: &str) {
        self.commands += 1;
        tracing::info!(channel, is_private, has_password = !password.is_empty(), "transport join_channel");
    }

    fn leave_channel(&mut self) {
        self.commands += 1;
        tracing::info!("transport leave_channel");
    }

    fn send_message(&mut self, text: &str) {
        self.commands += 1;
        tracing::info!(text, "transport send_message");
    }

    fn set_mute_video(&mut self, status: i32) {
        self.commands += 1;
        tracing::info!(status, "transport set_mute_video");
    }

    fn set_mute_audio(&mut self, status: i32) {
        self.commands += 1;
        tracing::info!(status, "transport set_mute_audio");
    }

    fn set_audio_volume(&mut self, user_id: &str, volume: i32) {
        self.commands += 1;
        tracing::info!(user_id, volume, "transport set_audio_volume");
    }
}
