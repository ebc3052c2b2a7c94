use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use confer_proto::RawFrame;

/// Issues raw frames and counts how many have been released.
///
/// Every frame handed to the engine must be released exactly once, whatever
/// path it takes. Compare [`ReleaseCounter::issued`] with
/// [`ReleaseCounter::released`] after the engine is done with them.
#[derive(Debug, Clone, Default)]
pub struct ReleaseCounter {
    issued: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl ReleaseCounter {
    /// New counter with nothing issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame of `len` bytes, every byte set to `fill`.
    pub fn frame(&self, len: usize, fill: u8) -> RawFrame {
        self.issued.fetch_add(1, Ordering::SeqCst);
        let released = Arc::clone(&self.released);
        RawFrame::with_release(vec![fill; len], move || {
            released.fetch_add(1, Ordering::SeqCst);
        })
    }

    /// Tightly packed RGBA32 frame of the given dimensions.
    pub fn rgba(&self, width: u32, height: u32, fill: u8) -> RawFrame {
        self.frame(width as usize * height as usize * 4, fill)
    }

    /// Frames issued so far.
    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }

    /// Release hooks run so far.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Whether every issued frame has been released.
    pub fn all_released(&self) -> bool {
        self.issued() == self.released()
    }
}
