//! Replay errors.

use std::io;

use confer_client::ClientError;
use confer_core::ConfigError;
use thiserror::Error;

/// Errors that stop a replay.
#[derive(Error, Debug)]
pub enum ReplayError {
    /// Script file could not be read.
    #[error("failed to read script: {0}")]
    Io(#[from] io::Error),

    /// A script line is not a valid op.
    #[error("script line {line}: {source}")]
    Script {
        /// 1-based line number
        line: usize,
        /// Parse failure
        #[source]
        source: serde_json::Error,
    },

    /// Session configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Runtime stopped accepting inbound messages.
    #[error(transparent)]
    Client(#[from] ClientError),
}
