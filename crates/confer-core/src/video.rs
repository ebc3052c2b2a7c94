//! Per-participant video frame buffers.
//!
//! Each participant owns one [`VideoFrame`]. The first valid frame allocates
//! a single RGBA32 buffer sized from its dimensions; every later frame is
//! copied into that same allocation, so the pixel slice handed to renderers
//! stays at a stable address for the participant's lifetime. Frames with
//! different dimensions are rejected rather than reallocating.

use confer_proto::{BYTES_PER_PIXEL, FrameMetadata, RawFrame};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Row layout of a frame buffer.
///
/// Transports deliver frames in their native row order; renderers read the
/// flag instead of the engine flipping rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOrder {
    /// First row in memory is the bottom of the image.
    #[default]
    BottomUp,
    /// First row in memory is the top of the image.
    TopDown,
}

/// Allocated RGBA32 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    row_order: RowOrder,
    pixels: Vec<u8>,
}

impl FrameBuffer {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row layout of `pixels`.
    pub fn row_order(&self) -> RowOrder {
        self.row_order
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Latest frame content, `width * height * 4` bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Outcome of a successful frame update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameUpdate {
    /// This frame allocated the buffer.
    pub(crate) initialized: bool,
}

/// A participant's frame slot: empty until the first valid frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoFrame {
    buffer: Option<FrameBuffer>,
}

impl VideoFrame {
    /// Whether a buffer has been allocated.
    pub fn is_initialized(&self) -> bool {
        self.buffer.is_some()
    }

    /// Allocated buffer, if any.
    pub fn buffer(&self) -> Option<&FrameBuffer> {
        self.buffer.as_ref()
    }

    /// Copy `frame` into the buffer, allocating it on first use.
    ///
    /// Validation happens before allocation, so a rejected first frame leaves
    /// the slot uninitialized. `frame` is consumed either way, which releases
    /// the transport's allocation before this returns.
    pub(crate) fn apply(
        &mut self,
        metadata: &FrameMetadata,
        frame: RawFrame,
        row_order: RowOrder,
    ) -> Result<FrameUpdate, SessionError> {
        let (width, height) = (metadata.width, metadata.height);
        if width == 0 || height == 0 {
            return Err(SessionError::InvalidDimensions { width, height });
        }

        if let Some(buffer) = &self.buffer
            && (buffer.width != width || buffer.height != height)
        {
            return Err(SessionError::FrameSizeMismatch {
                expected_width: buffer.width,
                expected_height: buffer.height,
                width,
                height,
            });
        }

        let expected = metadata
            .expected_len()
            .ok_or(SessionError::InvalidDimensions { width, height })?;
        let source = frame.as_bytes();
        if source.len() < expected {
            return Err(SessionError::FrameTooShort { expected, actual: source.len() });
        }

        let initialized = self.buffer.is_none();
        let buffer = self.buffer.get_or_insert_with(|| FrameBuffer {
            width,
            height,
            row_order,
            pixels: vec![0; expected],
        });
        buffer.pixels.copy_from_slice(&source[..expected]);

        Ok(FrameUpdate { initialized })
    }

    /// Release the buffer.
    pub(crate) fn dispose(&mut self) {
        self.buffer = None;
    }
}
