//! Outgoing transport commands.
//!
//! Every command is fire-and-forget: the transport reports the outcome, if
//! any, through a later notification. None of them returns a result.

/// Command issued by the session engine to the transport adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCommand {
    /// Initialize the transport and register notification callbacks.
    Init,

    /// Publish the local user's display metadata.
    SetUser {
        /// JSON-serialized [`crate::UserInfo`].
        user_info: String,
    },

    /// Start capturing and publishing local media.
    BeginMediaStream {
        /// Publish video.
        video: bool,
        /// Publish audio.
        audio: bool,
    },

    /// Connect the application to the conferencing service.
    Connect {
        /// Application credential, whitespace already stripped.
        app_key: String,
    },

    /// Join a channel.
    JoinChannel {
        /// Channel name.
        channel: String,
        /// Channel is private.
        is_private: bool,
        /// Channel password, empty when none.
        password: String,
    },

    /// Leave the current channel.
    LeaveChannel,

    /// Send a chat message to the current channel.
    SendMessage {
        /// Message text.
        text: String,
    },

    /// Mute or unmute local video.
    SetMuteVideo {
        /// Video is muted.
        muted: bool,
    },

    /// Mute or unmute local audio.
    SetMuteAudio {
        /// Audio is muted.
        muted: bool,
    },

    /// Set the playback volume of one remote participant.
    SetAudioVolume {
        /// Target participant id.
        user_id: String,
        /// Volume percentage in `0..=100`.
        volume: u8,
    },
}

impl TransportCommand {
    /// Integer flag for a boolean argument as the transport expects it.
    pub const fn flag(value: bool) -> i32 {
        if value { 1 } else { 0 }
    }

    /// Wire status for the mute commands.
    ///
    /// The transport's status is "track enabled", so muting sends `0`.
    pub const fn mute_status(muted: bool) -> i32 {
        Self::flag(!muted)
    }

    /// Short command name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::SetUser { .. } => "set_user",
            Self::BeginMediaStream { .. } => "begin_media_stream",
            Self::Connect { .. } => "connect",
            Self::JoinChannel { .. } => "join_channel",
            Self::LeaveChannel => "leave_channel",
            Self::SendMessage { .. } => "send_message",
            Self::SetMuteVideo { .. } => "set_mute_video",
            Self::SetMuteAudio { .. } => "set_mute_audio",
            Self::SetAudioVolume { .. } => "set_audio_volume",
        }
    }
}
