//! Confer client runtime.
//!
//! Connects the Sans-IO [`confer_core::Session`] to a concrete transport:
//!
//! - [`Transport`]: command surface the transport exposes
//! - [`InboundSender`]: thread-safe handle transport callbacks push
//!   notifications and frames into
//! - [`EventSink`]: where session events are delivered
//! - [`Runtime`]: drains the inbound channel on the home thread, applies each
//!   message to the session, and executes the resulting actions in order

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod inbound;
mod runtime;
mod sink;
mod transport;

pub use error::ClientError;
pub use inbound::{Inbound, InboundReceiver, InboundSender, inbound_channel};
pub use runtime::Runtime;
pub use sink::EventSink;
pub use transport::{NullTransport, Transport};
