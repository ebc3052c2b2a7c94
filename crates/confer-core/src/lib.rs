//! Confer session engine.
//!
//! Pure state machine for a client-side conferencing session: connection and
//! channel lifecycle, participant roster, chat history, per-participant video
//! frame buffers, and the spatial audio volume model.
//!
//! # Architecture
//!
//! The engine follows the Sans-IO action pattern. [`Session`] receives decoded
//! transport notifications and application commands as method calls, mutates
//! its state synchronously, and returns an ordered list of [`SessionAction`]s:
//! either a [`confer_proto::TransportCommand`] to hand to the transport or a
//! [`SessionEvent`] for the application. The caller executes them in order.
//!
//! The engine is not internally synchronized. Callers serialize every input
//! onto one home thread (see `confer-client`'s runtime for the channel that
//! does this).
//!
//! # Components
//!
//! - [`Session`]: top-level state machine
//! - [`ConnectionStatus`]: connection/channel lifecycle states
//! - [`Roster`]: participants, self identity, chat history
//! - [`VideoFrame`]: lazily allocated per-participant pixel buffer
//! - [`spatial`]: distance-based gain model
//! - [`SessionConfig`]: TOML-backed configuration

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod error;
mod event;
mod roster;
mod session;
pub mod spatial;
mod state;
mod video;

pub use config::{SessionConfig, VideoConfig};
pub use error::{ConfigError, SessionError};
pub use event::{SessionAction, SessionEvent};
pub use roster::{ChatMessage, Participant, ParticipantInfo, Roster};
pub use session::{ChannelRequest, DEFAULT_CHANNEL, Session};
pub use spatial::{
    FalloffCurve, Keyframe, KeyframeCurve, LinearCurve, Position, PositionProvider,
    SpatialAudioConfig,
};
pub use state::ConnectionStatus;
pub use video::{FrameBuffer, RowOrder, VideoFrame};
