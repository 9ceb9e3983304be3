//! Page state shared between sources.

use std::sync::atomic::{AtomicBool, Ordering};

/// Visibility flag written by the visibility tracker and read by the heartbeat.
#[derive(Debug)]
pub struct PageState {
    visible: AtomicBool,
}

impl PageState {
    pub fn new(visible: bool) -> Self {
        Self {
            visible: AtomicBool::new(visible),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    /// Returns the previous value.
    pub fn set_visible(&self, visible: bool) -> bool {
        self.visible.swap(visible, Ordering::SeqCst)
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(true)
    }
}
