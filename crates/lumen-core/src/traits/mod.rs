mod clock;
mod consent;
mod delivery;
mod exporter;
mod sampling;
mod scheduler;
mod sink;
mod storage;

pub use clock::IClock;
pub use consent::IConsentGate;
pub use delivery::{DeliveryRequest, IDeliveryClient};
pub use exporter::IExporter;
pub use sampling::ISampleSource;
pub use scheduler::{IScheduler, Job};
pub use sink::IEventSink;
pub use storage::IKeyValueStore;
