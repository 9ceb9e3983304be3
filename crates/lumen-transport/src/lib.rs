//! # lumen-transport
//!
//! Backend delivery for the telemetry pipeline. Dispatched events are queued,
//! cut into count/byte-capped batches and POSTed to the collector as
//! `{"events":[...]}`. Transient failures (network, 5xx, 429) are retried with
//! exponential backoff; 4xx drops the batch. A circuit breaker stops attempts
//! after repeated failures and lets a single trial through after a cooldown.
//!
//! Real HTTP delivery is feature-gated behind `http` (reqwest). Everything else
//! works against any [`lumen_core::traits::IDeliveryClient`].

pub mod batch;
pub mod breaker;
#[cfg(feature = "http")]
pub mod http_client;
pub mod protocol;
pub mod retry;
pub mod scheduler;
pub mod transport;

pub use breaker::{BreakerSnapshot, BreakerState, CircuitBreaker};
#[cfg(feature = "http")]
pub use http_client::{HttpDeliveryClient, HttpDeliveryClientConfig};
pub use protocol::{BatchBody, BatchEnvelope};
pub use retry::{DeliveryOutcome, RetryPolicy};
pub use scheduler::{ManualScheduler, TokioScheduler};
pub use transport::{
    BatchTransport, BatchTransportBuilder, FlushOutcome, SkipReason, TransportSnapshot,
};
