//! # lumen-sources
//!
//! Things that produce telemetry on their own: a visibility-gated heartbeat,
//! page visibility and focus changes, first sighting of configured page
//! sections, panics and host-reported errors, and paint/layout/input timing.
//!
//! Every source writes to an [`IEventSink`](lumen_core::traits::IEventSink),
//! normally the pipeline's `Telemetry`.

pub mod error_hooks;
pub mod heartbeat;
pub mod page;
pub mod perf;
pub mod sections;
pub mod visibility;

pub use heartbeat::{Heartbeat, HeartbeatHandle};
pub use page::PageState;
pub use perf::{PerfCapabilities, PerfObserver};
pub use sections::SectionTracker;
pub use visibility::VisibilityTracker;
