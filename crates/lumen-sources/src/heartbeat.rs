//! Periodic low-priority `heartbeat/tick` while the page is visible.

use std::sync::Arc;
use std::time::Duration;

use lumen_core::config::defaults::DEFAULT_HEARTBEAT_INTERVAL_MS;
use lumen_core::config::PipelineConfig;
use lumen_core::traits::IEventSink;
use lumen_core::{Action, Category, Event};
use lumen_observability::tracing_setup::events;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::page::PageState;

/// Heartbeat configuration. Use [`Heartbeat::start`] to run it.
#[derive(Debug, Clone)]
pub struct Heartbeat {
    interval: Duration,
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_HEARTBEAT_INTERVAL_MS))
    }
}

impl Heartbeat {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    /// Use `pipeline.heartbeat_interval_ms`.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(Duration::from_millis(config.heartbeat_interval_ms))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the ticker on the current tokio runtime. The first tick fires
    /// immediately. Each emitted tick carries its 1-based ordinal as `value`;
    /// ticks while the page is hidden are skipped and not counted.
    ///
    /// Outside a runtime nothing is spawned and the handle is inert.
    pub fn start(&self, sink: Arc<dyn IEventSink>, page: Arc<PageState>) -> HeartbeatHandle {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::debug!("heartbeat: no tokio runtime, not started");
                return HeartbeatHandle { task: None };
            }
        };
        let period = self.interval;
        events::heartbeat_started(period.as_millis() as u64);
        let task = handle.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut ordinal: u64 = 0;
            loop {
                ticker.tick().await;
                if !page.is_visible() {
                    continue;
                }
                ordinal += 1;
                sink.track(
                    Event::new(Category::Heartbeat, Action::Tick)
                        .with_value(ordinal as f64)
                        .low_priority(),
                );
            }
        });
        HeartbeatHandle { task: Some(task) }
    }
}

/// Stops the heartbeat when stopped or dropped.
#[derive(Debug)]
pub struct HeartbeatHandle {
    task: Option<JoinHandle<()>>,
}

impl HeartbeatHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for HeartbeatHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
