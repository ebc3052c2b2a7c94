//! Confer wire model.
//!
//! Types exchanged with the conferencing transport. The transport speaks in
//! two notification shapes and accepts a fixed command surface:
//!
//! - Structured notifications: a JSON envelope `{ status, type, data }` where
//!   `type` names one of a closed set of [`NotificationKind`]s and `data` is a
//!   kind-specific JSON (or plain text) payload.
//! - Binary notifications: a raw pixel buffer ([`RawFrame`]) paired with JSON
//!   [`FrameMetadata`].
//! - Commands: [`TransportCommand`], produced by the session engine and
//!   executed by the transport adapter.
//!
//! Decoding never panics. Malformed input yields a [`DecodeError`], envelopes
//! with `status = false` or an unrecognized `type` yield a non-event
//! [`Decoded`] variant so the caller can log and drop them.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod command;
pub mod errors;
pub mod frame;
pub mod notification;
pub mod payloads;

pub use command::TransportCommand;
pub use errors::{DecodeError, Result};
pub use frame::{BYTES_PER_PIXEL, FrameKind, FrameMetadata, RawFrame, decode_frame_metadata};
pub use notification::{Decoded, Envelope, Notification, NotificationKind, decode_notification};
pub use payloads::{IncomingMessage, ParticipantId, UserInfo};
