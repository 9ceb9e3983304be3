//! Page visibility and focus as engagement events.

use std::sync::Arc;

use lumen_core::traits::IEventSink;
use lumen_core::{Action, Category, Event};

use crate::page::PageState;
use crate::perf::PerfObserver;

/// Turns host visibility/focus signals into low-priority engagement events
/// and keeps the shared [`PageState`] current.
pub struct VisibilityTracker {
    sink: Arc<dyn IEventSink>,
    page: Arc<PageState>,
    perf: Option<Arc<PerfObserver>>,
}

impl VisibilityTracker {
    pub fn new(sink: Arc<dyn IEventSink>, page: Arc<PageState>) -> Self {
        Self {
            sink,
            page,
            perf: None,
        }
    }

    /// Latch performance finals when the page becomes hidden.
    pub fn with_perf(mut self, perf: Arc<PerfObserver>) -> Self {
        self.perf = Some(perf);
        self
    }

    pub fn page(&self) -> &Arc<PageState> {
        &self.page
    }

    /// Record a visibility change. Repeats of the current state are ignored.
    pub fn on_visibility_change(&self, visible: bool) {
        if self.page.set_visible(visible) == visible {
            return;
        }
        let label = if visible { "visible" } else { "hidden" };
        self.sink.track(
            Event::new(Category::Engagement, Action::VisibilityChange)
                .with_label(label)
                .low_priority(),
        );
        if !visible {
            if let Some(perf) = &self.perf {
                perf.finalize();
            }
        }
    }

    /// Record the window gaining or losing focus.
    pub fn on_focus_change(&self, focused: bool) {
        let label = if focused { "focus" } else { "blur" };
        self.sink.track(
            Event::new(Category::Engagement, Action::Focus)
                .with_label(label)
                .low_priority(),
        );
    }
}
