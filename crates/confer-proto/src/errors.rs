//! Decoding errors.
//!
//! Every failure to turn transport input into a typed value ends up here. The
//! session engine treats all of them as recoverable-by-drop.

use thiserror::Error;

/// Result alias for decoding operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Errors raised while decoding transport notifications.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The outer JSON envelope could not be parsed.
    #[error("malformed envelope: {0}")]
    Envelope(String),

    /// The `data` payload did not match the shape expected for its kind.
    #[error("invalid {kind} payload: {reason}")]
    Payload {
        /// Notification kind whose payload failed to decode.
        kind: &'static str,
        /// Parser error description.
        reason: String,
    },

    /// Message timestamp is outside the representable range.
    #[error("timestamp out of range: {0}ms")]
    Timestamp(i64),

    /// Binary notification carried a kind other than a video frame.
    #[error("unknown frame kind: {0}")]
    UnknownFrameKind(String),
}

impl DecodeError {
    /// Build a payload error for the given kind from any displayable cause.
    pub fn payload(kind: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::Payload { kind, reason: reason.to_string() }
    }
}
