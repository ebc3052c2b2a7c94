//! Replay script format.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_json::Value;

use crate::error::ReplayError;

/// One script step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// Queue a structured notification. `payload` is the full envelope.
    Notify {
        /// Envelope object
        payload: Value,
    },
    /// Queue a binary frame of `width * height * 4` bytes set to `fill`.
    Frame {
        /// Frame metadata object
        metadata: Value,
        /// Byte value for every pixel channel
        #[serde(default)]
        fill: u8,
    },
    /// Publish local user metadata.
    SetUser {
        /// User info object
        user: Value,
    },
    /// Connect with the configured app key.
    Connect,
    /// Join a channel.
    Join {
        /// Channel name, `"default"` when absent
        #[serde(default)]
        channel: Option<String>,
        /// Private channel
        #[serde(default, rename = "private")]
        is_private: bool,
        /// Channel password
        #[serde(default)]
        password: Option<String>,
    },
    /// Leave the current channel.
    Leave,
    /// Send a chat message.
    Send {
        /// Message text
        text: String,
    },
    /// Mute or unmute local audio.
    MuteAudio {
        /// Muted
        muted: bool,
    },
    /// Mute or unmute local video.
    MuteVideo {
        /// Muted
        muted: bool,
    },
    /// Set a participant's volume.
    Volume {
        /// Target participant
        user: String,
        /// Gain in `[0, 1]`
        volume: f32,
    },
    /// Start local media.
    BeginStream {
        /// Publish video
        #[serde(default)]
        video: bool,
        /// Publish audio
        #[serde(default)]
        audio: bool,
    },
    /// Place a participant at a fixed position.
    Position {
        /// Participant
        user: String,
        /// X coordinate
        x: f32,
        /// Y coordinate
        y: f32,
        /// Z coordinate
        z: f32,
    },
    /// Recompute spatial volume for one participant, or every remote one.
    Spatial {
        /// Participant, all when absent
        #[serde(default)]
        user: Option<String>,
    },
}

/// Parse a JSON Lines script. Blank lines and `#` comments are skipped.
pub fn parse_script(source: &str) -> Result<Vec<Op>, ReplayError> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str(line)
                .map_err(|source| ReplayError::Script { line: index + 1, source })
        })
        .collect()
}

/// Read and parse a script file.
pub fn load_script(path: impl AsRef<Path>) -> Result<Vec<Op>, ReplayError> {
    let source = fs::read_to_string(path)?;
    parse_script(&source)
}
