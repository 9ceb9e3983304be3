//! The delivery queue and its flush loop.
//!
//! State lives behind one `std::sync::Mutex`. Every lock is taken inside a
//! synchronous helper and released before the send or the backoff sleep, so
//! flush futures stay `Send` and never block each other across an await.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use lumen_core::config::{defaults, TransportConfig, TransportConfigPatch};
use lumen_core::constants::LAST_FLUSH_STORAGE_KEY;
use lumen_core::errors::TransportError;
use lumen_core::traits::{
    DeliveryRequest, IClock, IConsentGate, IDeliveryClient, IKeyValueStore, IScheduler,
};
use lumen_core::{EnrichedEvent, SystemClock};
use lumen_observability::tracing_setup::events;
use lumen_observability::DeliveryMetrics;
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::batch::{encode_batch, requeue_front, take_batch};
use crate::breaker::{BreakerSnapshot, BreakerState, CircuitBreaker};
use crate::retry::{deliver_with_retry, DeliveryOutcome, RetryPolicy};
use crate::scheduler::TokioScheduler;

/// Why a flush did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Disabled,
    NoConsent,
    Empty,
    InFlight,
    BreakerOpen,
}

/// What a call to [`BatchTransport::flush`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushOutcome {
    Skipped(SkipReason),
    /// Every batch sent in this flush got a 2xx.
    Delivered { events: usize, batches: usize },
    /// Permanent failure; the batch is gone.
    Dropped {
        events: usize,
        error: TransportError,
    },
    /// Retries exhausted; the batch is back at the front of the queue.
    Requeued { events: usize },
    /// Retries exhausted and the breaker is now open; the batch is gone.
    Discarded { events: usize },
}

impl FlushOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// Debug view of the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportSnapshot {
    pub enabled: bool,
    pub endpoint: String,
    pub use_beacon: bool,
    pub queued: usize,
    pub in_flight: bool,
    pub breaker: BreakerSnapshot,
    pub last_flush: Option<DateTime<Utc>>,
    pub metrics: DeliveryMetrics,
}

struct TransportState {
    config: TransportConfig,
    queue: VecDeque<EnrichedEvent>,
    breaker: CircuitBreaker,
    in_flight: bool,
    flush_scheduled: bool,
    last_flush: Option<DateTime<Utc>>,
    metrics: DeliveryMetrics,
}

struct Inner<C> {
    client: C,
    consent: Arc<dyn IConsentGate>,
    clock: Arc<dyn IClock>,
    scheduler: Arc<dyn IScheduler>,
    store: Option<Arc<dyn IKeyValueStore>>,
    flush_delay: Duration,
    max_queue_len: usize,
    state: Mutex<TransportState>,
}

/// One batch taken off the queue, ready to send.
struct PreparedBatch {
    events: Vec<EnrichedEvent>,
    request: Result<DeliveryRequest, TransportError>,
    policy: RetryPolicy,
}

/// Result of settling one batch.
enum Settled {
    Delivered(usize),
    Failed(FlushOutcome),
}

/// Owns the in-flight flag for one flush. Whatever batch it still holds when
/// dropped was never settled and goes back to the front of the queue.
struct FlushGuard<'a, C: IDeliveryClient> {
    transport: &'a BatchTransport<C>,
    force: bool,
    in_hand: Vec<EnrichedEvent>,
}

impl<C: IDeliveryClient> Drop for FlushGuard<'_, C> {
    fn drop(&mut self) {
        let in_hand = std::mem::take(&mut self.in_hand);
        self.transport.finish_flush(self.force, in_hand);
    }
}

/// Builder for [`BatchTransport`].
pub struct BatchTransportBuilder<C> {
    client: C,
    config: TransportConfig,
    consent: Arc<dyn IConsentGate>,
    clock: Arc<dyn IClock>,
    scheduler: Arc<dyn IScheduler>,
    store: Option<Arc<dyn IKeyValueStore>>,
    flush_delay: Duration,
    max_queue_len: usize,
}

impl<C: IDeliveryClient> BatchTransportBuilder<C> {
    pub fn new(client: C, config: TransportConfig, consent: Arc<dyn IConsentGate>) -> Self {
        Self {
            client,
            config,
            consent,
            clock: Arc::new(SystemClock),
            scheduler: Arc::new(TokioScheduler),
            store: None,
            flush_delay: Duration::from_millis(defaults::DEFAULT_BACKEND_FLUSH_DELAY_MS),
            max_queue_len: defaults::DEFAULT_MAX_QUEUE_LEN,
        }
    }

    pub fn clock(mut self, clock: Arc<dyn IClock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn scheduler(mut self, scheduler: Arc<dyn IScheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Where the last successful flush time is persisted.
    pub fn store(mut self, store: Arc<dyn IKeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Delay between an enqueue and the flush it schedules.
    pub fn flush_delay(mut self, delay: Duration) -> Self {
        self.flush_delay = delay;
        self
    }

    pub fn max_queue_len(mut self, len: usize) -> Self {
        self.max_queue_len = len.max(1);
        self
    }

    pub fn build(self) -> BatchTransport<C> {
        let last_flush = self.store.as_deref().and_then(load_last_flush);
        let breaker = CircuitBreaker::new(
            self.config.circuit_breaker_threshold,
            self.config.circuit_breaker_cooldown(),
        );
        BatchTransport {
            inner: Arc::new(Inner {
                client: self.client,
                consent: self.consent,
                clock: self.clock,
                scheduler: self.scheduler,
                store: self.store,
                flush_delay: self.flush_delay,
                max_queue_len: self.max_queue_len,
                state: Mutex::new(TransportState {
                    config: self.config,
                    queue: VecDeque::new(),
                    breaker,
                    in_flight: false,
                    flush_scheduled: false,
                    last_flush,
                    metrics: DeliveryMetrics::new(),
                }),
            }),
        }
    }
}

fn load_last_flush(store: &dyn IKeyValueStore) -> Option<DateTime<Utc>> {
    match store.get(LAST_FLUSH_STORAGE_KEY) {
        Ok(Some(raw)) => match DateTime::parse_from_rfc3339(&raw) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(e) => {
                tracing::debug!(error = %e, "transport: ignoring unparseable last flush timestamp");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "transport: failed to read last flush timestamp");
            None
        }
    }
}

/// Batched, retrying, breaker-guarded delivery to the collector.
///
/// Cheap to clone; clones share the queue and breaker.
pub struct BatchTransport<C> {
    inner: Arc<Inner<C>>,
}

impl<C> Clone for BatchTransport<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: IDeliveryClient> BatchTransport<C> {
    pub fn builder(
        client: C,
        config: TransportConfig,
        consent: Arc<dyn IConsentGate>,
    ) -> BatchTransportBuilder<C> {
        BatchTransportBuilder::new(client, config, consent)
    }

    fn lock(&self) -> MutexGuard<'_, TransportState> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().config.enabled
    }

    pub fn config(&self) -> TransportConfig {
        self.lock().config.clone()
    }

    pub fn queue_len(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn breaker_state(&self) -> BreakerState {
        let now = self.inner.clock.now();
        self.lock().breaker.state(now)
    }

    /// Apply a partial config update and return the resulting config.
    pub fn configure(&self, patch: &TransportConfigPatch) -> TransportConfig {
        let mut state = self.lock();
        state.config.apply(patch);
        let (threshold, cooldown) = (
            state.config.circuit_breaker_threshold,
            state.config.circuit_breaker_cooldown(),
        );
        state.breaker.reconfigure(threshold, cooldown);
        state.config.clone()
    }

    /// Queue a dispatched event for delivery and schedule a flush.
    ///
    /// Returns true when the queue was full and its oldest event was dropped.
    /// Events are discarded while the transport is disabled.
    pub fn enqueue(&self, event: EnrichedEvent) -> bool {
        let (overflowed, delay) = {
            let mut state = self.lock();
            if !state.config.enabled {
                return false;
            }
            let overflowed = state.queue.len() >= self.inner.max_queue_len;
            if overflowed {
                state.queue.pop_front();
            }
            state.queue.push_back(event);

            let full_batch = state.queue.len() >= state.config.batch_size_limit;
            let delay = if full_batch {
                Some(Duration::ZERO)
            } else if !state.flush_scheduled {
                Some(self.inner.flush_delay)
            } else {
                None
            };
            if delay.is_some() {
                state.flush_scheduled = true;
            }
            (overflowed, delay)
        };
        if overflowed {
            events::queue_overflow("delivery", self.inner.max_queue_len);
        }
        if let Some(delay) = delay {
            self.schedule_flush(delay);
        }
        overflowed
    }

    fn schedule_flush(&self, delay: Duration) {
        let this = self.clone();
        self.inner.scheduler.schedule(
            delay,
            Box::pin(async move {
                this.lock().flush_scheduled = false;
                this.flush(false).await;
            }),
        );
    }

    /// Attempt delivery.
    ///
    /// A normal flush sends at most one batch. A forced flush (unload) uses
    /// keep-alive when `use_beacon` is set and keeps sending until the queue
    /// is empty or a batch fails.
    ///
    /// Dropping the returned future mid-send puts the batch being sent back at
    /// the front of the queue and releases the in-flight flag.
    pub async fn flush(&self, force: bool) -> FlushOutcome {
        let (queued, keepalive) = match self.begin_flush(force) {
            Ok(plan) => plan,
            Err(reason) => return FlushOutcome::Skipped(reason),
        };
        let mut guard = FlushGuard {
            transport: self,
            force,
            in_hand: Vec::new(),
        };
        let span = lumen_observability::flush_span!(queued, force);
        let outcome = self.run_flush(&mut guard, keepalive).instrument(span).await;
        drop(guard);
        outcome
    }

    async fn run_flush(&self, guard: &mut FlushGuard<'_, C>, keepalive: bool) -> FlushOutcome {
        let mut delivered = 0;
        let mut batches = 0;
        while let Some(prepared) = self.next_batch(keepalive) {
            let count = prepared.events.len();
            guard.in_hand = prepared.events;
            let outcome = match prepared.request {
                Ok(request) => {
                    let span = lumen_observability::delivery_span!(count, batches + 1);
                    deliver_with_retry(&self.inner.client, request, prepared.policy)
                        .instrument(span)
                        .await
                }
                Err(error) => DeliveryOutcome::Permanent { error, attempts: 0 },
            };
            match self.settle(std::mem::take(&mut guard.in_hand), outcome) {
                Settled::Delivered(n) => {
                    delivered += n;
                    batches += 1;
                }
                Settled::Failed(outcome) => return outcome,
            }
            if !guard.force || !self.can_continue() {
                break;
            }
        }
        FlushOutcome::Delivered {
            events: delivered,
            batches,
        }
    }

    /// Checks every precondition and marks the flush in flight.
    fn begin_flush(&self, force: bool) -> Result<(usize, bool), SkipReason> {
        if !self.inner.consent.has_consent() {
            if self.is_enabled() {
                return Err(SkipReason::NoConsent);
            }
            return Err(SkipReason::Disabled);
        }
        let now = self.inner.clock.now();
        let mut state = self.lock();
        if !state.config.enabled {
            return Err(SkipReason::Disabled);
        }
        if state.queue.is_empty() {
            return Err(SkipReason::Empty);
        }
        if state.in_flight {
            return Err(SkipReason::InFlight);
        }
        if !state.breaker.allows_attempt(now) {
            state.metrics.breaker_rejections += 1;
            events::flush_skipped_breaker_open(state.queue.len());
            // Come back once the cooldown is over instead of waiting for the
            // next enqueue.
            let wake = if state.flush_scheduled {
                None
            } else {
                state.breaker.remaining_cooldown(now)
            };
            if wake.is_some() {
                state.flush_scheduled = true;
            }
            drop(state);
            if let Some(delay) = wake {
                self.schedule_flush(delay);
            }
            return Err(SkipReason::BreakerOpen);
        }
        state.in_flight = true;
        Ok((state.queue.len(), force && state.config.use_beacon))
    }

    fn can_continue(&self) -> bool {
        let now = self.inner.clock.now();
        let state = self.lock();
        !state.queue.is_empty() && state.breaker.allows_attempt(now)
    }

    fn next_batch(&self, keepalive: bool) -> Option<PreparedBatch> {
        let now = self.inner.clock.now();
        let mut state = self.lock();
        // A half-open breaker gets exactly one trial: one event, one attempt.
        let half_open = state.breaker.state(now) == BreakerState::HalfOpen;
        let (max_events, policy) = if half_open {
            (1, RetryPolicy::once())
        } else {
            (
                state.config.batch_size_limit,
                RetryPolicy::new(state.config.max_retries, state.config.retry_base_delay()),
            )
        };
        let max_bytes = state.config.batch_bytes_limit;
        let events = take_batch(&mut state.queue, max_events, max_bytes);
        if events.is_empty() {
            return None;
        }
        let endpoint = state.config.endpoint.clone();
        drop(state);

        let request = encode_batch(&events).map(|body| DeliveryRequest {
            endpoint,
            body,
            keepalive,
        });
        Some(PreparedBatch {
            events,
            request,
            policy,
        })
    }

    /// Apply one batch's outcome to the breaker, queue and metrics.
    fn settle(&self, batch: Vec<EnrichedEvent>, outcome: DeliveryOutcome) -> Settled {
        let now = self.inner.clock.now();
        let count = batch.len();
        let mut state = self.lock();
        state.metrics.retries += u64::from(outcome.attempts().saturating_sub(1));

        match outcome {
            DeliveryOutcome::Delivered { status, attempts } => {
                if state.breaker.record_success() {
                    events::breaker_closed();
                }
                state.metrics.record_delivered(count);
                state.last_flush = Some(now);
                drop(state);
                events::batch_delivered(count, status, attempts);
                self.persist_last_flush(now);
                Settled::Delivered(count)
            }
            DeliveryOutcome::Permanent { error, .. } => {
                self.record_failure(&mut state, now);
                state.metrics.record_dropped(count);
                drop(state);
                events::batch_dropped(count, &error.to_string());
                Settled::Failed(FlushOutcome::Dropped {
                    events: count,
                    error,
                })
            }
            DeliveryOutcome::Exhausted { error, .. } => {
                self.record_failure(&mut state, now);
                if state.breaker.is_open() {
                    state.metrics.record_dropped(count);
                    drop(state);
                    events::batch_dropped(count, &format!("breaker open after {error}"));
                    Settled::Failed(FlushOutcome::Discarded { events: count })
                } else {
                    requeue_front(&mut state.queue, batch);
                    state.metrics.batches_requeued += 1;
                    drop(state);
                    events::batch_requeued(count);
                    Settled::Failed(FlushOutcome::Requeued { events: count })
                }
            }
        }
    }

    fn record_failure(&self, state: &mut TransportState, now: DateTime<Utc>) {
        if state.breaker.record_failure(now) {
            state.metrics.breaker_opens += 1;
            events::breaker_opened(
                state.breaker.consecutive_failures(),
                state.config.circuit_breaker_cooldown_ms,
            );
        }
    }

    /// Puts back any batch still in hand, clears the in-flight flag and
    /// schedules a re-flush if work remains.
    fn finish_flush(&self, force: bool, in_hand: Vec<EnrichedEvent>) {
        let reflush = {
            let mut state = self.lock();
            if !in_hand.is_empty() {
                let count = in_hand.len();
                requeue_front(&mut state.queue, in_hand);
                state.metrics.batches_requeued += 1;
                events::batch_requeued(count);
            }
            state.in_flight = false;
            let reflush = !force && !state.queue.is_empty() && !state.flush_scheduled;
            if reflush {
                state.flush_scheduled = true;
            }
            reflush.then(|| state.config.retry_base_delay())
        };
        if let Some(delay) = reflush {
            self.schedule_flush(delay);
        }
    }

    fn persist_last_flush(&self, at: DateTime<Utc>) {
        if let Some(store) = &self.inner.store {
            if let Err(e) = store.set(LAST_FLUSH_STORAGE_KEY, &at.to_rfc3339()) {
                tracing::warn!(error = %e, "transport: failed to persist last flush timestamp");
            }
        }
    }

    /// Debug helper: make the next breaker check half-open.
    pub fn force_half_open(&self) {
        let now = self.inner.clock.now();
        self.lock().breaker.force_half_open(now);
    }

    pub fn snapshot(&self) -> TransportSnapshot {
        let now = self.inner.clock.now();
        let state = self.lock();
        TransportSnapshot {
            enabled: state.config.enabled,
            endpoint: state.config.endpoint.clone(),
            use_beacon: state.config.use_beacon,
            queued: state.queue.len(),
            in_flight: state.in_flight,
            breaker: state.breaker.snapshot(now),
            last_flush: state.last_flush,
            metrics: state.metrics.clone(),
        }
    }
}
