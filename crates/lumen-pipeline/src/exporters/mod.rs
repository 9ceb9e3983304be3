//! Best-effort third-party sinks and the isolation wrapper around them.

mod data_layer;
mod tracing_exporter;

pub use data_layer::DataLayerExporter;
pub use tracing_exporter::TracingExporter;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use lumen_core::errors::ExportError;
use lumen_core::traits::IExporter;
use lumen_core::EnrichedEvent;
use lumen_observability::tracing_setup::events;

/// Run one exporter, turning both returned errors and panics into `ExportError`.
pub fn export_isolated(exporter: &dyn IExporter, event: &EnrichedEvent) -> Result<(), ExportError> {
    match catch_unwind(AssertUnwindSafe(|| exporter.export(event))) {
        Ok(result) => result,
        Err(_) => Err(ExportError::Panicked {
            exporter: exporter.name().to_string(),
        }),
    }
}

/// Hand `event` to every exporter in order. One failing exporter never
/// stops the others. Returns the number of failures.
pub fn export_all(exporters: &[Arc<dyn IExporter>], event: &EnrichedEvent, dev_mode: bool) -> usize {
    let mut failures = 0;
    for exporter in exporters {
        if let Err(e) = export_isolated(exporter.as_ref(), event) {
            failures += 1;
            events::exporter_failed(exporter.name(), &e.to_string(), dev_mode);
        }
    }
    failures
}
