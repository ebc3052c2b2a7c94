//! Scripted replay of transport traffic through a Confer session.
//!
//! A script is JSON Lines: one [`Op`] per line. Notification and frame ops
//! are queued on the inbound channel exactly as a transport callback would
//! queue them; command ops call the runtime directly after draining whatever
//! is queued. Transport commands and session events are logged through
//! `tracing`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod replay;
mod script;
mod transport;

pub use error::ReplayError;
pub use replay::{ParticipantSummary, ReplaySummary, replay};
pub use script::{Op, load_script, parse_script};
pub use transport::LoggingTransport;
