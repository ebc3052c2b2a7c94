//! Client errors.

use thiserror::Error;

/// Errors surfaced to transport callback code.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientError {
    /// The runtime owning the receiving end has been dropped.
    #[error("inbound channel closed")]
    ChannelClosed,
}
