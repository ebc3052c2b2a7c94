//! Inbound message channel.
//!
//! Transport callbacks fire on whatever thread the transport uses. They push
//! into an [`InboundSender`], which is cheap to clone and safe to share; the
//! [`crate::Runtime`] owns the single receiver and applies messages on its
//! home thread in delivery order.

use confer_proto::{FrameMetadata, RawFrame};
use tokio::sync::mpsc;

use crate::error::ClientError;

/// Message from the transport to the runtime.
#[derive(Debug)]
pub enum Inbound {
    /// Structured JSON notification.
    Notification(String),
    /// Binary notification: decoded metadata plus the pixel buffer.
    Frame {
        /// Frame metadata.
        metadata: FrameMetadata,
        /// Pixel buffer, released when dropped.
        frame: RawFrame,
    },
    /// Binary notification whose metadata has not been decoded yet.
    RawFrame {
        /// Metadata JSON.
        metadata: String,
        /// Pixel buffer, released when dropped.
        frame: RawFrame,
    },
}

/// Sending half of the inbound channel.
#[derive(Debug, Clone)]
pub struct InboundSender {
    tx: mpsc::UnboundedSender<Inbound>,
}

impl InboundSender {
    /// Queue a JSON notification.
    pub fn notify(&self, json: impl Into<String>) -> Result<(), ClientError> {
        self.send(Inbound::Notification(json.into()))
    }

    /// Queue a video frame with decoded metadata.
    ///
    /// If the runtime is gone the frame is dropped, which releases it.
    pub fn frame(&self, metadata: FrameMetadata, frame: RawFrame) -> Result<(), ClientError> {
        self.send(Inbound::Frame { metadata, frame })
    }

    /// Queue a video frame with metadata JSON.
    pub fn raw_frame(
        &self,
        metadata: impl Into<String>,
        frame: RawFrame,
    ) -> Result<(), ClientError> {
        self.send(Inbound::RawFrame { metadata: metadata.into(), frame })
    }

    /// Queue any inbound message.
    pub fn send(&self, message: Inbound) -> Result<(), ClientError> {
        self.tx.send(message).map_err(|_| ClientError::ChannelClosed)
    }

    /// Whether the receiving runtime has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving half of the inbound channel.
#[derive(Debug)]
pub struct InboundReceiver {
    rx: mpsc::UnboundedReceiver<Inbound>,
}

impl InboundReceiver {
    /// Next message if one is queued.
    pub fn try_recv(&mut self) -> Option<Inbound> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next message. `None` once every sender is dropped.
    pub async fn recv(&mut self) -> Option<Inbound> {
        self.rx.recv().await
    }
}

/// Create a connected sender/receiver pair.
pub fn inbound_channel() -> (InboundSender, InboundReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (InboundSender { tx }, InboundReceiver { rx })
}
