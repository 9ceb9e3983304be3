//! # lumen-core
//!
//! Foundation crate for the Lumen telemetry pipeline.
//! Defines the event schema, errors, config, clocks, and the traits at the
//! host boundary (storage, delivery, exporters, scheduling).
//! Every other crate in the workspace depends on this.

pub mod clock;
pub mod config;
pub mod constants;
pub mod errors;
pub mod event;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use clock::{ManualClock, SystemClock};
pub use config::LumenConfig;
pub use errors::{LumenError, LumenResult};
pub use event::{Action, Category, EnrichedEvent, Event, Metadata, Priority, RawEvent};
