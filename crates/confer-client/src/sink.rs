//! Event delivery to the application.

use confer_core::SessionEvent;

/// Receives session events in emission order.
pub trait EventSink {
    /// Deliver one event.
    fn on_event(&mut self, event: SessionEvent);
}

impl<F: FnMut(SessionEvent)> EventSink for F {
    fn on_event(&mut self, event: SessionEvent) {
        self(event);
    }
}
