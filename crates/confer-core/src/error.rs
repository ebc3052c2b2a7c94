//! Error types for the session engine.
//!
//! None of these escape to the transport: the engine logs them (when logging
//! is enabled) and drops the offending input. They are public so the roster
//! and frame operations can be driven directly in tests and tools.

use std::io;

use confer_proto::{DecodeError, ParticipantId};
use thiserror::Error;

/// Errors raised while applying an input to the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No roster entry with this id.
    #[error("participant not found: {id}")]
    ParticipantNotFound {
        /// Requested id
        id: ParticipantId,
    },

    /// A participant with this id is already in the roster.
    #[error("participant already connected: {id}")]
    DuplicateParticipant {
        /// Conflicting id
        id: ParticipantId,
    },

    /// Frame announced zero width or height.
    #[error("invalid frame dimensions {width}x{height}")]
    InvalidDimensions {
        /// Announced width
        width: u32,
        /// Announced height
        height: u32,
    },

    /// Frame dimensions differ from the allocated buffer.
    #[error("frame size mismatch: buffer is {expected_width}x{expected_height}, frame is {width}x{height}")]
    FrameSizeMismatch {
        /// Allocated buffer width
        expected_width: u32,
        /// Allocated buffer height
        expected_height: u32,
        /// Incoming frame width
        width: u32,
        /// Incoming frame height
        height: u32,
    },

    /// Frame buffer is shorter than its dimensions require.
    #[error("frame too short: need {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Bytes required by the dimensions
        expected: usize,
        /// Bytes delivered
        actual: usize,
    },

    /// Notification or frame metadata failed to decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Errors raised while loading a [`crate::SessionConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),

    /// Config file is not valid TOML or has wrong field types.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of its allowed range.
    #[error("invalid config: {0}")]
    Invalid(String),
}
