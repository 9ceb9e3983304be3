use std::sync::{Arc, Mutex};
use std::time::Duration;

use lumen_core::config::LumenConfig;
use lumen_core::traits::{IClock, IDeliveryClient, IExporter, IKeyValueStore, ISampleSource, IScheduler};
use lumen_core::SystemClock;
use lumen_observability::PipelineMetrics;
use lumen_privacy::MetadataSanitizer;
use lumen_transport::{BatchTransport, TokioScheduler};

use super::telemetry::{DispatchState, Inner, Telemetry};
use crate::consent::ConsentStore;
use crate::dedup::Deduplicator;
use crate::queues::BoundedQueue;
use crate::sampler::{RandSampleSource, Sampler};
use crate::storage::MemoryStore;

/// Builder for [`Telemetry`].
///
/// Only the delivery client is required; everything else has a production
/// default (system clock, tokio timers, thread RNG, in-memory storage).
pub struct TelemetryBuilder<C> {
    client: C,
    config: LumenConfig,
    store: Arc<dyn IKeyValueStore>,
    clock: Arc<dyn IClock>,
    scheduler: Arc<dyn IScheduler>,
    sample_source: Box<dyn ISampleSource>,
    exporters: Vec<Arc<dyn IExporter>>,
    session_id: Option<String>,
}

impl<C: IDeliveryClient> TelemetryBuilder<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            config: LumenConfig::default(),
            store: Arc::new(MemoryStore::new()),
            clock: Arc::new(SystemClock),
            scheduler: Arc::new(TokioScheduler),
            sample_source: Box::new(RandSampleSource),
            exporters: Vec::new(),
            session_id: None,
        }
    }

    pub fn config(mut self, config: LumenConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(mut self, store: Arc<dyn IKeyValueStore>) -> Self {
        self.store = store;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn IClock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn scheduler(mut self, scheduler: Arc<dyn IScheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn sample_source(mut self, source: Box<dyn ISampleSource>) -> Self {
        self.sample_source = source;
        self
    }

    pub fn exporter(mut self, exporter: Arc<dyn IExporter>) -> Self {
        self.exporters.push(exporter);
        self
    }

    /// Pin the session id instead of generating one.
    pub fn session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    pub fn build(self) -> Telemetry<C> {
        let pipeline = self.config.pipeline;
        let consent = Arc::new(ConsentStore::load(Arc::clone(&self.store)));

        let transport = BatchTransport::builder(self.client, self.config.transport, consent.clone())
            .clock(Arc::clone(&self.clock))
            .scheduler(Arc::clone(&self.scheduler))
            .store(Arc::clone(&self.store))
            .flush_delay(Duration::from_millis(pipeline.backend_flush_delay_ms))
            .max_queue_len(pipeline.max_queue_len)
            .build();

        let state = DispatchState {
            pre_consent: BoundedQueue::new("pre_consent", pipeline.max_queue_len),
            low_priority: BoundedQueue::new("low_priority", pipeline.max_queue_len),
            sampler: Sampler::new(&self.config.sampling, self.sample_source),
            dedup: Deduplicator::new(pipeline.dedup_capacity),
            idle_flush_scheduled: false,
            metrics: PipelineMetrics::new(),
        };

        let session_id = self
            .session_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        tracing::debug!(session_id = %session_id, consent = consent.has_consent(), "telemetry: pipeline created");

        Telemetry::from_inner(Inner {
            session_id,
            sanitizer: MetadataSanitizer::new(pipeline.metadata_whitelist.iter().cloned()),
            consent,
            transport,
            clock: self.clock,
            scheduler: self.scheduler,
            exporters: Mutex::new(self.exporters),
            deferred: Mutex::new(BoundedQueue::new("deferred", pipeline.max_queue_len)),
            pipeline,
            state: Mutex::new(state),
        })
    }
}
