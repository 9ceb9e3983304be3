//! # lumen-pipeline
//!
//! Consent-gated dispatch core. Events are held in a pre-consent queue until
//! the visitor opts in, low priority events wait for an idle flush, and
//! everything else goes straight through validation, sampling and
//! deduplication to the registered exporters and the backend transport.
//!
//! ```no_run
//! # #[cfg(feature = "http")]
//! # async fn demo() -> lumen_core::LumenResult<()> {
//! use lumen_core::{Action, Category, Event};
//! use lumen_pipeline::Telemetry;
//! use lumen_transport::{HttpDeliveryClient, HttpDeliveryClientConfig};
//!
//! let client = HttpDeliveryClient::new(HttpDeliveryClientConfig::default())?;
//! let telemetry = Telemetry::builder(client).build();
//! telemetry.set_consent(true);
//! telemetry.track(Event::new(Category::Perf, Action::HeroPaint).with_value(120.0));
//! telemetry.on_page_hide().await;
//! # Ok(())
//! # }
//! ```

pub mod consent;
pub mod dedup;
pub mod engine;
pub mod exporters;
pub mod queues;
pub mod sampler;
pub mod storage;
pub mod validator;

pub use consent::ConsentStore;
pub use dedup::Deduplicator;
pub use engine::{DebugSnapshot, Telemetry, TelemetryBuilder, TrackOutcome};
pub use exporters::{DataLayerExporter, TracingExporter};
pub use sampler::{FixedSampleSource, RandSampleSource, Sampler};
pub use storage::{FileStore, MemoryStore};
