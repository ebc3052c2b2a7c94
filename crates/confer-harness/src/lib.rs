//! Test harness for Confer.
//!
//! Fixtures shared by the engine, runtime, and replay tests:
//!
//! - [`notify`]: builders for transport notification JSON
//! - [`ReleaseCounter`]: raw frames that count their releases
//! - [`RecordingTransport`]: transport that records every command
//!
//! # Invariant Testing
//!
//! The `invariants` module extracts a [`SessionSnapshot`] from a session and
//! runs registered [`Invariant`] checks against it. Use
//! [`InvariantRegistry::standard()`] after every input in property tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod frames;
pub mod invariants;
pub mod notify;
mod transport;

pub use frames::ReleaseCounter;
pub use invariants::{
    FrameDimensions, Invariant, InvariantRegistry, InvariantResult, ParticipantSnapshot,
    SelfInRoster, SessionSnapshot, SingleSelf, UniqueParticipants, Violation,
};
pub use transport::RecordingTransport;
