//! Dispatch engine: the [`Telemetry`] context object, its builder and the
//! debug snapshot.

mod builder;
mod snapshot;
mod telemetry;

pub use builder::TelemetryBuilder;
pub use snapshot::DebugSnapshot;
pub use telemetry::{Telemetry, TrackOutcome};
