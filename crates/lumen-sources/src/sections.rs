//! First sighting of configured page sections.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use lumen_core::config::defaults::DEFAULT_SECTION_VISIBILITY_THRESHOLD;
use lumen_core::config::PipelineConfig;
use lumen_core::traits::IEventSink;
use lumen_core::{Action, Category, Event};

/// Emits one `navigation/section_view` per configured region, the first
/// time its visible ratio reaches the threshold.
pub struct SectionTracker {
    sink: Arc<dyn IEventSink>,
    regions: HashSet<String>,
    threshold: f64,
    reported: Mutex<HashSet<String>>,
}

impl SectionTracker {
    pub fn new<I, S>(sink: Arc<dyn IEventSink>, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sink,
            regions: regions.into_iter().map(Into::into).collect(),
            threshold: DEFAULT_SECTION_VISIBILITY_THRESHOLD,
            reported: Mutex::new(HashSet::new()),
        }
    }

    /// Track `regions` with `pipeline.section_visibility_threshold`.
    pub fn from_config<I, S>(sink: Arc<dyn IEventSink>, regions: I, config: &PipelineConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(sink, regions).with_threshold(config.section_visibility_threshold)
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Feed an intersection report. Returns true if this emitted an event.
    pub fn observe(&self, region: &str, visible_ratio: f64) -> bool {
        if !self.regions.contains(region) || visible_ratio < self.threshold {
            return false;
        }
        let first = self
            .reported
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(region.to_string());
        if first {
            self.sink.track(
                Event::new(Category::Navigation, Action::SectionView)
                    .with_label(region)
                    .with_meta("visible_ratio", visible_ratio)
                    .low_priority(),
            );
        }
        first
    }

    pub fn has_reported(&self, region: &str) -> bool {
        self.reported
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(region)
    }
}
