//! Binary notifications: raw video frames.
//!
//! A binary notification hands the engine a pixel buffer allocated by the
//! transport together with JSON metadata. The buffer is wrapped in a
//! [`RawFrame`], which owns the transport's release hook and runs it exactly
//! once when dropped. Whatever path the engine takes (copy, mismatch, unknown
//! participant, decode failure) the allocation goes back to the transport.

use std::fmt;

use bytes::Bytes;
use serde::Deserialize;

use crate::{
    errors::{DecodeError, Result},
    payloads::ParticipantId,
};

/// Bytes per pixel of the fixed RGBA32 frame format.
pub const BYTES_PER_PIXEL: usize = 4;

/// Closed set of binary notification kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// One decoded video frame for a participant.
    VideoFrameReceived,
}

impl FrameKind {
    /// Look up a kind by its wire name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "VideoFrameReceived" => Some(Self::VideoFrameReceived),
            _ => None,
        }
    }
}

/// Decoded metadata of a binary notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameMetadata {
    /// Frame kind.
    pub kind: FrameKind,
    /// Participant the frame belongs to.
    pub user_id: ParticipantId,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Buffer length announced by the transport, in bytes.
    pub length: u64,
}

impl FrameMetadata {
    /// Byte length of a tightly packed RGBA32 frame of these dimensions.
    ///
    /// `None` if the size does not fit in `usize`.
    pub fn expected_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FrameMetadataWire {
    #[serde(rename = "type")]
    kind: String,
    user_id: String,
    width: u32,
    height: u32,
    #[serde(default)]
    length: u64,
}

/// Decode binary-notification metadata.
///
/// # Errors
///
/// - [`DecodeError::Envelope`] if the JSON is malformed or has negative sizes
/// - [`DecodeError::UnknownFrameKind`] for any kind but `VideoFrameReceived`
pub fn decode_frame_metadata(json: &str) -> Result<FrameMetadata> {
    let wire: FrameMetadataWire =
        serde_json::from_str(json).map_err(|e| DecodeError::Envelope(e.to_string()))?;

    let kind = FrameKind::parse(&wire.kind).ok_or(DecodeError::UnknownFrameKind(wire.kind))?;

    Ok(FrameMetadata {
        kind,
        user_id: ParticipantId::new(wire.user_id),
        width: wire.width,
        height: wire.height,
        length: wire.length,
    })
}

type ReleaseHook = Box<dyn FnOnce() + Send>;

/// Pixel buffer handed over by the transport.
///
/// Ownership moves into the engine for the duration of one frame update. The
/// release hook (if any) runs exactly once, when the `RawFrame` is dropped.
pub struct RawFrame {
    data: Bytes,
    release: Option<ReleaseHook>,
}

impl RawFrame {
    /// Wrap a buffer that needs no release beyond dropping its bytes.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into(), release: None }
    }

    /// Wrap a buffer whose backing allocation is freed by `release`.
    pub fn with_release(data: impl Into<Bytes>, release: impl FnOnce() + Send + 'static) -> Self {
        Self { data: data.into(), release: Some(Box::new(release)) }
    }

    /// Raw pixel bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Buffer length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Drop for RawFrame {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawFrame")
            .field("len", &self.data.len())
            .field("release", &self.release.is_some())
            .finish()
    }
}
