#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use lumen_core::config::LumenConfig;
use lumen_core::constants::{CONSENT_GRANTED, CONSENT_STORAGE_KEY};
use lumen_core::errors::{ExportError, TransportError};
use lumen_core::traits::{DeliveryRequest, IDeliveryClient, IExporter, IKeyValueStore};
use lumen_core::{EnrichedEvent, ManualClock};
use lumen_pipeline::{DataLayerExporter, FixedSampleSource, MemoryStore, Telemetry};
use lumen_transport::{BatchBody, ManualScheduler};

#[derive(Clone, Default)]
pub struct ScriptedClient {
    responses: Arc<Mutex<VecDeque<Result<u16, TransportError>>>>,
    requests: Arc<Mutex<Vec<DeliveryRequest>>>,
}

impl ScriptedClient {
    pub fn respond_n(&self, n: usize, status: u16) {
        let mut responses = self.responses.lock().unwrap();
        for _ in 0..n {
            responses.push_back(Ok(status));
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<DeliveryRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn bodies(&self) -> Vec<BatchBody> {
        self.requests()
            .iter()
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }

    /// Every delivered event across all requests, in send order.
    pub fn sent_events(&self) -> Vec<EnrichedEvent> {
        self.bodies().into_iter().flat_map(|b| b.events).collect()
    }
}

impl IDeliveryClient for ScriptedClient {
    fn send(
        &self,
        request: DeliveryRequest,
    ) -> impl std::future::Future<Output = Result<u16, TransportError>> + Send {
        self.requests.lock().unwrap().push(request);
        let response = self.responses.lock().unwrap().pop_front().unwrap_or(Ok(200));
        async move { response }
    }
}

pub struct FailingExporter;

impl IExporter for FailingExporter {
    fn name(&self) -> &str {
        "failing"
    }

    fn export(&self, _event: &EnrichedEvent) -> Result<(), ExportError> {
        Err(ExportError::Failed {
            exporter: "failing".into(),
            reason: "tag manager not loaded".into(),
        })
    }
}

pub struct PanickingExporter;

impl IExporter for PanickingExporter {
    fn name(&self) -> &str {
        "panicking"
    }

    fn export(&self, _event: &EnrichedEvent) -> Result<(), ExportError> {
        panic!("exporter blew up");
    }
}

pub struct Setup {
    pub telemetry: Telemetry<ScriptedClient>,
    pub client: ScriptedClient,
    pub scheduler: Arc<ManualScheduler>,
    pub clock: Arc<ManualClock>,
    pub store: Arc<MemoryStore>,
    pub data_layer: DataLayerExporter,
}

impl Setup {
    /// Actions seen by the data layer, in dispatch order.
    pub fn exported_actions(&self) -> Vec<String> {
        self.data_layer
            .records()
            .iter()
            .map(|r| r["action"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    /// Run scheduled jobs until none are left.
    pub async fn settle(&self) {
        for _ in 0..10 {
            if self.scheduler.run_all().await == 0 {
                break;
            }
        }
    }
}

pub fn base_config() -> LumenConfig {
    let mut config = LumenConfig::default();
    config.transport.enabled = true;
    config.transport.endpoint = "https://collector.test/api/telemetry".into();
    config.sampling = lumen_core::config::SamplingConfig::keep_all();
    config
}

pub fn setup_with(config: LumenConfig, consent: bool) -> Setup {
    let client = ScriptedClient::default();
    let scheduler = Arc::new(ManualScheduler::new());
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0).unwrap(),
    ));
    let store = Arc::new(MemoryStore::new());
    if consent {
        store.set(CONSENT_STORAGE_KEY, CONSENT_GRANTED).unwrap();
    }
    let data_layer = DataLayerExporter::new();

    let telemetry = Telemetry::builder(client.clone())
        .config(config)
        .store(store.clone())
        .clock(clock.clone())
        .scheduler(scheduler.clone())
        .sample_source(Box::new(FixedSampleSource::new(vec![0.0])))
        .exporter(Arc::new(data_layer.clone()))
        .session_id("session-test")
        .build();

    Setup {
        telemetry,
        client,
        scheduler,
        clock,
        store,
        data_layer,
    }
}

pub fn setup(consent: bool) -> Setup {
    setup_with(base_config(), consent)
}
