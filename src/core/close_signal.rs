use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Single-slot, edge-triggered close request.
///
/// The window event source calls [`request`](Self::request); the render loop
/// drains it with [`take`](Self::take). Repeated requests before a take
/// collapse into one.
#[derive(Debug, Clone, Default)]
pub struct CloseSignal {
    requested: Arc<AtomicBool>,
}

impl CloseSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
    }

    /// Returns true once per pending request, consuming it
    pub fn take(&self) -> bool {
        self.requested.swap(false, Ordering::AcqRel)
    }
}
