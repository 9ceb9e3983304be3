//! Paint, layout-shift and first-input timing.
//!
//! Times are milliseconds on the host's page clock (`performance.now()`
//! analogue), so the observer itself never reads a clock.

use std::sync::{Arc, Mutex};

use lumen_core::config::defaults::DEFAULT_CLS_INPUT_EXCLUSION_MS;
use lumen_core::config::PipelineConfig;
use lumen_core::traits::IEventSink;
use lumen_core::{Action, Category, Event};

/// Which entry types the host can observe. Unsupported ones make the
/// corresponding methods silent no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerfCapabilities {
    pub largest_contentful_paint: bool,
    pub layout_shift: bool,
    pub first_input: bool,
}

impl PerfCapabilities {
    pub fn all() -> Self {
        Self {
            largest_contentful_paint: true,
            layout_shift: true,
            first_input: true,
        }
    }

    pub fn none() -> Self {
        Self {
            largest_contentful_paint: false,
            layout_shift: false,
            first_input: false,
        }
    }
}

impl Default for PerfCapabilities {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Debug, Default)]
struct PerfState {
    lcp_latest: Option<f64>,
    lcp_first_reported: bool,
    lcp_final_reported: bool,
    cls_total: f64,
    cls_reported: bool,
    last_input_ms: Option<f64>,
    fid_reported: bool,
}

pub struct PerfObserver {
    sink: Arc<dyn IEventSink>,
    capabilities: PerfCapabilities,
    started_at_ms: f64,
    input_exclusion_ms: f64,
    state: Mutex<PerfState>,
}

impl PerfObserver {
    /// `started_at_ms` is the page-clock time the observer was attached; the
    /// first-input delay surrogate is measured from it.
    pub fn new(sink: Arc<dyn IEventSink>, capabilities: PerfCapabilities, started_at_ms: f64) -> Self {
        Self {
            sink,
            capabilities,
            started_at_ms,
            input_exclusion_ms: DEFAULT_CLS_INPUT_EXCLUSION_MS as f64,
            state: Mutex::new(PerfState::default()),
        }
    }

    /// Like [`new`](Self::new), with the CLS input exclusion window taken
    /// from `pipeline.cls_input_exclusion_ms`.
    pub fn from_config(
        sink: Arc<dyn IEventSink>,
        capabilities: PerfCapabilities,
        started_at_ms: f64,
        config: &PipelineConfig,
    ) -> Self {
        Self::new(sink, capabilities, started_at_ms).with_input_exclusion_ms(config.cls_input_exclusion_ms)
    }

    pub fn with_input_exclusion_ms(mut self, ms: u64) -> Self {
        self.input_exclusion_ms = ms as f64;
        self
    }

    pub fn capabilities(&self) -> PerfCapabilities {
        self.capabilities
    }

    fn state(&self) -> std::sync::MutexGuard<'_, PerfState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// A new largest-contentful-paint candidate. The first one is reported as
    /// `perf/hero_paint`; later ones only update the final value.
    pub fn on_lcp_candidate(&self, render_time_ms: f64) {
        if !self.capabilities.largest_contentful_paint {
            return;
        }
        let first = {
            let mut state = self.state();
            if state.lcp_final_reported {
                return;
            }
            state.lcp_latest = Some(render_time_ms);
            !std::mem::replace(&mut state.lcp_first_reported, true)
        };
        if first {
            self.sink
                .track(Event::new(Category::Perf, Action::HeroPaint).with_value(render_time_ms));
        }
    }

    /// A layout shift. Shifts within the input exclusion window are ignored.
    pub fn on_layout_shift(&self, value: f64, at_ms: f64) {
        if !self.capabilities.layout_shift {
            return;
        }
        let mut state = self.state();
        if state.cls_reported {
            return;
        }
        let recent_input = state
            .last_input_ms
            .is_some_and(|input| at_ms >= input && at_ms - input <= self.input_exclusion_ms);
        if !recent_input {
            state.cls_total += value;
        }
    }

    /// A pointer or key input. The first one reports the first-input delay
    /// surrogate and latches the final LCP.
    pub fn on_input(&self, at_ms: f64) {
        let first = {
            let mut state = self.state();
            state.last_input_ms = Some(at_ms);
            !std::mem::replace(&mut state.fid_reported, true)
        };
        if first && self.capabilities.first_input {
            let delay = (at_ms - self.started_at_ms).max(0.0);
            self.sink
                .track(Event::new(Category::Perf, Action::Fid).with_value(delay));
        }
        self.latch_lcp();
    }

    /// Page hidden or unloading: latch LCP and report accumulated CLS.
    /// Only the first call reports anything.
    pub fn finalize(&self) {
        self.latch_lcp();
        if !self.capabilities.layout_shift {
            return;
        }
        let total = {
            let mut state = self.state();
            if std::mem::replace(&mut state.cls_reported, true) {
                return;
            }
            state.cls_total
        };
        self.sink
            .track(Event::new(Category::Perf, Action::ClsTotal).with_value(total));
    }

    fn latch_lcp(&self) {
        if !self.capabilities.largest_contentful_paint {
            return;
        }
        let latest = {
            let mut state = self.state();
            if state.lcp_final_reported {
                return;
            }
            state.lcp_final_reported = true;
            state.lcp_latest
        };
        if let Some(value) = latest {
            self.sink.track(
                Event::new(Category::Perf, Action::PerfMetric)
                    .with_label("lcp_final")
                    .with_value(value),
            );
        }
    }

    pub fn cls_total(&self) -> f64 {
        self.state().cls_total
    }
}
