use std::sync::{Arc, Mutex};
use std::time::Duration;

use lumen_core::traits::IEventSink;
use lumen_core::{Action, Event, LumenConfig, Priority};
use lumen_sources::{
    Heartbeat, PageState, PerfCapabilities, PerfObserver, SectionTracker, VisibilityTracker,
};

#[derive(Default)]
struct RecordingSink(Mutex<Vec<Event>>);

impl RecordingSink {
    fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    fn actions(&self) -> Vec<Action> {
        self.events().into_iter().map(|e| e.action).collect()
    }
}

impl IEventSink for RecordingSink {
    fn track(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }
}

fn sink() -> Arc<RecordingSink> {
    Arc::new(RecordingSink::default())
}

fn tuned_config() -> LumenConfig {
    LumenConfig::from_toml_str(
        r#"
        [pipeline]
        heartbeat_interval_ms = 5000
        section_visibility_threshold = 0.8
        cls_input_exclusion_ms = 100
        "#,
    )
    .unwrap()
}

// ── Heartbeat ─────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn heartbeat_ticks_only_while_visible() {
    let recorder = sink();
    let page = Arc::new(PageState::new(true));
    let handle = Heartbeat::new(Duration::from_secs(30)).start(recorder.clone(), page.clone());
    assert!(handle.is_running());

    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(recorder.events().len(), 1, "first tick is immediate");

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(recorder.events().len(), 2);

    page.set_visible(false);
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(recorder.events().len(), 2);

    page.set_visible(true);
    tokio::time::sleep(Duration::from_secs(30)).await;
    let events = recorder.events();
    assert_eq!(events.len(), 3);
    assert_eq!(events[2].value, Some(3.0));
    assert!(events.iter().all(|e| e.priority == Priority::Low && e.action == Action::Tick));

    drop(handle);
    tokio::time::sleep(Duration::from_secs(90)).await;
    assert_eq!(recorder.events().len(), 3);
}

#[test]
fn heartbeat_outside_runtime_is_inert() {
    let handle = Heartbeat::default().start(sink(), Arc::new(PageState::default()));
    assert!(!handle.is_running());
}

// ── Visibility ────────────────────────────────────────────────────────────

#[test]
fn visibility_changes_update_page_state_once() {
    let recorder = sink();
    let page = Arc::new(PageState::new(true));
    let tracker = VisibilityTracker::new(recorder.clone(), page.clone());

    tracker.on_visibility_change(true);
    assert!(recorder.events().is_empty());

    tracker.on_visibility_change(false);
    tracker.on_visibility_change(false);
    assert!(!page.is_visible());
    tracker.on_focus_change(true);

    let events = recorder.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].action, Action::VisibilityChange);
    assert_eq!(events[0].label.as_deref(), Some("hidden"));
    assert_eq!(events[1].action, Action::Focus);
    assert_eq!(events[1].label.as_deref(), Some("focus"));
}

#[test]
fn hiding_the_page_finalizes_perf() {
    let recorder = sink();
    let perf = Arc::new(PerfObserver::new(recorder.clone(), PerfCapabilities::all(), 0.0));
    let tracker = VisibilityTracker::new(recorder.clone(), Arc::new(PageState::new(true)))
        .with_perf(perf.clone());

    perf.on_lcp_candidate(900.0);
    tracker.on_visibility_change(false);

    assert_eq!(
        recorder.actions(),
        [
            Action::HeroPaint,
            Action::VisibilityChange,
            Action::PerfMetric,
            Action::ClsTotal
        ]
    );
}

// ── Sections ──────────────────────────────────────────────────────────────

#[test]
fn section_view_fires_once_at_threshold() {
    let recorder = sink();
    let sections = SectionTracker::new(recorder.clone(), ["pricing", "faq"]);

    assert!(!sections.observe("pricing", 0.2));
    assert!(sections.observe("pricing", 0.35));
    assert!(!sections.observe("pricing", 0.9));
    assert!(!sections.observe("footer", 1.0));
    assert!(sections.observe("faq", 0.5));

    let events = recorder.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].action, Action::SectionView);
    assert_eq!(events[0].label.as_deref(), Some("pricing"));
    assert!(events[0].is_low_priority());
    assert!(sections.has_reported("faq"));
    assert!(!sections.has_reported("footer"));
}

// ── Performance ───────────────────────────────────────────────────────────

#[test]
fn lcp_reports_first_candidate_and_latches_final_on_input() {
    let recorder = sink();
    let perf = PerfObserver::new(recorder.clone(), PerfCapabilities::all(), 100.0);

    perf.on_lcp_candidate(800.0);
    perf.on_lcp_candidate(1200.0);
    perf.on_input(1500.0);
    perf.on_lcp_candidate(2000.0);
    perf.on_input(1600.0);
    perf.finalize();

    let events = recorder.events();
    let summary: Vec<_> = events
        .iter()
        .map(|e| (e.action, e.label.clone(), e.value))
        .collect();
    assert_eq!(
        summary,
        [
            (Action::HeroPaint, None, Some(800.0)),
            (Action::Fid, None, Some(1400.0)),
            (Action::PerfMetric, Some("lcp_final".to_string()), Some(1200.0)),
            (Action::ClsTotal, None, Some(0.0)),
        ]
    );
}

#[test]
fn cls_excludes_shifts_right_after_input() {
    let recorder = sink();
    let perf = PerfObserver::new(recorder.clone(), PerfCapabilities::all(), 0.0)
        .with_input_exclusion_ms(500);

    perf.on_layout_shift(0.05, 100.0);
    perf.on_input(1000.0);
    perf.on_layout_shift(0.3, 1200.0);
    perf.on_layout_shift(0.02, 1800.0);
    perf.finalize();
    perf.finalize();
    perf.on_layout_shift(0.4, 5000.0);

    let cls: Vec<_> = recorder
        .events()
        .into_iter()
        .filter(|e| e.action == Action::ClsTotal)
        .collect();
    assert_eq!(cls.len(), 1);
    let total = cls[0].value.unwrap();
    assert!((total - 0.07).abs() < 1e-9);
}

#[test]
fn unsupported_capabilities_are_silent() {
    let recorder = sink();
    let perf = PerfObserver::new(recorder.clone(), PerfCapabilities::none(), 0.0);

    perf.on_lcp_candidate(500.0);
    perf.on_layout_shift(0.2, 10.0);
    perf.on_input(40.0);
    perf.finalize();

    assert!(recorder.events().is_empty());
}

// ── Configured sources ────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn heartbeat_uses_configured_interval() {
    let config = tuned_config();
    let heartbeat = Heartbeat::from_config(&config.pipeline);
    assert_eq!(heartbeat.interval(), Duration::from_secs(5));

    let recorder = sink();
    let _handle = heartbeat.start(recorder.clone(), Arc::new(PageState::new(true)));

    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(recorder.events().len(), 1);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(recorder.events().len(), 2);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(recorder.events().len(), 4);
}

#[test]
fn section_tracker_uses_configured_threshold() {
    let config = tuned_config();
    let recorder = sink();
    let sections = SectionTracker::from_config(recorder.clone(), ["pricing"], &config.pipeline);

    assert!(!sections.observe("pricing", 0.5));
    assert!(recorder.events().is_empty());
    assert!(sections.observe("pricing", 0.8));
    assert_eq!(recorder.events().len(), 1);
}

#[test]
fn perf_observer_uses_configured_input_exclusion() {
    let config = tuned_config();
    let recorder = sink();
    let perf = PerfObserver::from_config(
        recorder.clone(),
        PerfCapabilities::all(),
        0.0,
        &config.pipeline,
    );

    perf.on_input(1000.0);
    perf.on_layout_shift(0.4, 1050.0);
    perf.on_layout_shift(0.1, 1200.0);

    assert!((perf.cls_total() - 0.1).abs() < 1e-9);
}
