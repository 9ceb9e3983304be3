//! The pipeline context object and its public operations.

use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use std::time::Duration;

use lumen_core::config::{PipelineConfig, SamplingConfig, TransportConfig, TransportConfigPatch};
use lumen_core::traits::{IClock, IDeliveryClient, IEventSink, IExporter, IScheduler};
use lumen_core::{Action, Category, EnrichedEvent, Event, RawEvent};
use lumen_observability::tracing_setup::events;
use lumen_observability::{MetricsCollector, PipelineMetrics};
use lumen_privacy::MetadataSanitizer;
use lumen_transport::{BatchTransport, FlushOutcome, SkipReason};
use serde_json::json;

use super::builder::TelemetryBuilder;
use super::snapshot::DebugSnapshot;
use crate::consent::ConsentStore;
use crate::dedup::Deduplicator;
use crate::exporters::export_all;
use crate::queues::BoundedQueue;
use crate::sampler::{self, Sampler};
use crate::validator;

/// What happened to a tracked event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    /// Held until consent is granted.
    PreConsent,
    /// Held until the idle flush.
    LowPriority,
    /// Sent to exporters and, if enabled, queued for the backend.
    Dispatched { event_id: String },
    /// Failed the schema check.
    Rejected,
    /// Dropped by the sampler.
    SampledOut,
    /// Event id already dispatched recently.
    Duplicate,
}

pub(crate) struct DispatchState {
    pub(crate) pre_consent: BoundedQueue,
    pub(crate) low_priority: BoundedQueue,
    pub(crate) sampler: Sampler,
    pub(crate) dedup: Deduplicator,
    pub(crate) idle_flush_scheduled: bool,
    pub(crate) metrics: PipelineMetrics,
}

pub(crate) struct Inner<C> {
    pub(crate) session_id: String,
    pub(crate) consent: Arc<ConsentStore>,
    pub(crate) transport: BatchTransport<C>,
    pub(crate) clock: Arc<dyn IClock>,
    pub(crate) scheduler: Arc<dyn IScheduler>,
    pub(crate) sanitizer: MetadataSanitizer,
    pub(crate) exporters: Mutex<Vec<Arc<dyn IExporter>>>,
    pub(crate) pipeline: PipelineConfig,
    pub(crate) state: Mutex<DispatchState>,
    /// Events reported while `state` was held on the reporting thread.
    pub(crate) deferred: Mutex<BoundedQueue>,
}

/// Consent-gated telemetry pipeline for one page load.
///
/// Cheap to clone; clones share all state. Nothing here returns an error or
/// panics into the caller: rejections and delivery failures are logged and
/// counted.
pub struct Telemetry<C> {
    inner: Arc<Inner<C>>,
}

impl<C> Clone for Telemetry<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: IDeliveryClient> Telemetry<C> {
    pub fn builder(client: C) -> TelemetryBuilder<C> {
        TelemetryBuilder::new(client)
    }

    pub(crate) fn from_inner(inner: Inner<C>) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    fn state(&self) -> MutexGuard<'_, DispatchState> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn session_id(&self) -> &str {
        &self.inner.session_id
    }

    pub fn transport(&self) -> &BatchTransport<C> {
        &self.inner.transport
    }

    // ── Tracking ──────────────────────────────────────────────────────────

    /// Record an event.
    ///
    /// Without consent it waits in the pre-consent queue. Low priority events
    /// wait for the idle flush. Everything else is dispatched synchronously
    /// before this returns.
    pub fn track(&self, event: Event) -> TrackOutcome {
        self.drain_deferred();
        self.track_one(event)
    }

    fn track_one(&self, event: Event) -> TrackOutcome {
        let has_consent = self.inner.consent.has_consent();
        let mut state = self.state();
        state.metrics.tracked += 1;
        if !has_consent {
            if state.pre_consent.push(event) {
                state.metrics.queue_overflows += 1;
            }
            return TrackOutcome::PreConsent;
        }
        if !event.is_low_priority() {
            drop(state);
            return self.dispatch(event);
        }
        if state.low_priority.push(event) {
            state.metrics.queue_overflows += 1;
        }
        let schedule = !state.idle_flush_scheduled;
        state.idle_flush_scheduled = true;
        drop(state);
        if schedule {
            self.schedule_idle_flush();
        }
        TrackOutcome::LowPriority
    }

    /// Record a loosely typed host record. Unknown or mismatched
    /// category/action strings are rejected here.
    pub fn track_raw(&self, raw: RawEvent) -> TrackOutcome {
        let (category, action) = (raw.category.clone(), raw.action.clone());
        match validator::parse_raw(raw) {
            Ok(event) => self.track(event),
            Err(e) => {
                {
                    let mut state = self.state();
                    state.metrics.tracked += 1;
                    state.metrics.rejected += 1;
                }
                events::event_rejected(&category, &action, &e.to_string(), self.inner.pipeline.dev_mode);
                TrackOutcome::Rejected
            }
        }
    }

    /// Validate → sample → dedup → enrich → exporters → backend queue.
    ///
    /// The dispatch lock only covers plain bookkeeping. The sample draw, the
    /// clock and the sanitizer all run outside it.
    fn dispatch(&self, event: Event) -> TrackOutcome {
        let span = lumen_observability::dispatch_span!(event.category, event.action);
        let _guard = span.enter();

        if !validator::is_valid(event.category, event.action) {
            self.state().metrics.rejected += 1;
            events::event_rejected(
                event.category.as_str(),
                event.action.as_str(),
                "action not allowed for category",
                self.inner.pipeline.dev_mode,
            );
            return TrackOutcome::Rejected;
        }

        let (rate, source) = {
            let state = self.state();
            (state.sampler.rate(event.category), state.sampler.source())
        };
        if !sampler::keep(rate, source.as_ref()) {
            self.state().metrics.sampled_out += 1;
            return TrackOutcome::SampledOut;
        }

        let event_id = event
            .event_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        {
            let mut state = self.state();
            if !state.dedup.seen(&event_id) {
                state.metrics.duplicates += 1;
                drop(state);
                tracing::debug!(event_id = %event_id, "telemetry: duplicate event dropped");
                return TrackOutcome::Duplicate;
            }
            state.metrics.dispatched += 1;
        }
        let enriched = self.enrich(event, event_id);

        let exporters = self
            .inner
            .exporters
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        let failures = export_all(&exporters, &enriched, self.inner.pipeline.dev_mode);
        if failures > 0 {
            self.state().metrics.exporter_failures += failures as u64;
        }

        let event_id = enriched.event_id.clone();
        if self.inner.transport.is_enabled() && self.inner.transport.enqueue(enriched) {
            self.state().metrics.queue_overflows += 1;
        }
        TrackOutcome::Dispatched { event_id }
    }

    fn enrich(&self, event: Event, event_id: String) -> EnrichedEvent {
        EnrichedEvent {
            event_id,
            session_id: self.inner.session_id.clone(),
            event_category: event.category,
            event_action: event.action,
            event_label: event.label,
            event_value: event.value,
            metadata: event.metadata.map(|m| self.inner.sanitizer.sanitize(&m)),
            priority: event.priority,
            timestamp: self.inner.clock.now(),
        }
    }

    fn schedule_idle_flush(&self) {
        let this = self.clone();
        self.inner.scheduler.schedule(
            Duration::from_millis(self.inner.pipeline.idle_flush_timeout_ms),
            Box::pin(async move {
                this.state().idle_flush_scheduled = false;
                this.flush_low_priority_queue();
            }),
        );
    }

    /// Track everything held back by [`IEventSink::track_nonblocking`].
    fn drain_deferred(&self) {
        let deferred = self
            .inner
            .deferred
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain();
        for event in deferred {
            self.track_one(event);
        }
    }

    // ── Consent ───────────────────────────────────────────────────────────

    pub fn has_consent(&self) -> bool {
        self.inner.consent.has_consent()
    }

    /// Persist a consent decision. A transition to granted records
    /// `lifecycle/consent_granted`; queued events stay queued until
    /// [`flush_pre_consent_queue`](Self::flush_pre_consent_queue).
    pub fn set_consent(&self, granted: bool) {
        let previous = self.inner.consent.set_consent(granted);
        if granted && !previous {
            self.track(Event::new(Category::Lifecycle, Action::ConsentGranted));
        }
    }

    /// Drain the pre-consent queue and attempt a backend flush.
    /// Does nothing without consent.
    pub async fn flush_pre_consent_queue(&self) -> FlushOutcome {
        if !self.has_consent() {
            return FlushOutcome::Skipped(SkipReason::NoConsent);
        }
        let (drained, schedule_idle) = {
            let mut state = self.state();
            let drained = state.pre_consent.drain();
            let mut high = Vec::with_capacity(drained.len());
            let mut overflows = 0;
            for event in drained {
                if event.is_low_priority() {
                    if state.low_priority.push(event) {
                        overflows += 1;
                    }
                } else {
                    high.push(event);
                }
            }
            state.metrics.queue_overflows += overflows;
            let schedule = !state.low_priority.is_empty() && !state.idle_flush_scheduled;
            if schedule {
                state.idle_flush_scheduled = true;
            }
            (high, schedule)
        };
        if schedule_idle {
            self.schedule_idle_flush();
        }
        tracing::debug!(events = drained.len(), "telemetry: draining pre-consent queue");
        for event in drained {
            self.dispatch(event);
        }
        self.inner.transport.flush(false).await
    }

    /// Dispatch everything in the low-priority queue. Returns how many
    /// events were taken off the queue.
    ///
    /// If consent was revoked since they were queued, they move back to the
    /// pre-consent queue instead.
    pub fn flush_low_priority_queue(&self) -> usize {
        let has_consent = self.has_consent();
        let drained = {
            let mut state = self.state();
            let drained = state.low_priority.drain();
            if !has_consent {
                let mut overflows = 0;
                for event in drained {
                    if state.pre_consent.push(event) {
                        overflows += 1;
                    }
                }
                state.metrics.queue_overflows += overflows;
                return 0;
            }
            drained
        };
        let count = drained.len();
        for event in drained {
            self.dispatch(event);
        }
        count
    }

    // ── Transport ─────────────────────────────────────────────────────────

    /// Apply a partial transport configuration and record
    /// `config/transport_configured`.
    pub fn configure_transport(&self, patch: &TransportConfigPatch) -> TransportConfig {
        let config = self.inner.transport.configure(patch);
        tracing::info!(
            enabled = config.enabled,
            endpoint = %config.endpoint,
            "telemetry: transport configured"
        );
        self.track(
            Event::new(Category::Config, Action::TransportConfigured)
                .with_meta("enabled", config.enabled)
                .with_meta("batch_size_limit", json!(config.batch_size_limit))
                .low_priority(),
        );
        config
    }

    /// Replace the sampling table and record `config/sampling_updated`.
    pub fn update_sampling(&self, sampling: &SamplingConfig) {
        self.state().sampler.set_rates(sampling);
        self.track(Event::new(Category::Config, Action::SamplingUpdated).low_priority());
    }

    /// Attempt a backend flush now.
    pub async fn flush(&self, force: bool) -> FlushOutcome {
        self.inner.transport.flush(force).await
    }

    /// Unload path: record `lifecycle/page_hide`, dispatch the low-priority
    /// queue synchronously, then force a keep-alive flush.
    pub async fn on_page_hide(&self) -> FlushOutcome {
        self.track(Event::new(Category::Lifecycle, Action::PageHide));
        self.flush_low_priority_queue();
        self.inner.transport.flush(true).await
    }

    // ── Exporters & introspection ─────────────────────────────────────────

    pub fn register_exporter(&self, exporter: Arc<dyn IExporter>) {
        tracing::debug!(exporter = exporter.name(), "telemetry: exporter registered");
        self.inner
            .exporters
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(exporter);
    }

    pub fn metrics(&self) -> MetricsCollector {
        MetricsCollector {
            pipeline: self.state().metrics.clone(),
            delivery: self.inner.transport.snapshot().metrics,
        }
    }

    pub fn snapshot(&self) -> DebugSnapshot {
        let transport = self.inner.transport.snapshot();
        let exporters = self
            .inner
            .exporters
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|e| e.name().to_string())
            .collect();
        let state = self.state();
        DebugSnapshot {
            session_id: self.inner.session_id.clone(),
            consent: self.inner.consent.has_consent(),
            pre_consent_queued: state.pre_consent.len(),
            low_priority_queued: state.low_priority.len(),
            dedup_size: state.dedup.len(),
            sampling: state.sampler.rates().clone(),
            exporters,
            metrics: MetricsCollector {
                pipeline: state.metrics.clone(),
                delivery: transport.metrics.clone(),
            },
            transport,
        }
    }
}

impl<C: IDeliveryClient> IEventSink for Telemetry<C> {
    fn track(&self, event: Event) {
        Telemetry::track(self, event);
    }

    /// Tracks right away unless this thread is already inside dispatch, in
    /// which case the event waits for the next `track`.
    fn track_nonblocking(&self, event: Event) {
        let busy = matches!(self.inner.state.try_lock(), Err(TryLockError::WouldBlock));
        if busy {
            let mut deferred = self.inner.deferred.lock().unwrap_or_else(|e| e.into_inner());
            deferred.push(event);
            return;
        }
        Telemetry::track(self, event);
    }
}
