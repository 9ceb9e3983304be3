use crate::errors::ExportError;
use crate::event::EnrichedEvent;

/// Best-effort third-party sink (data layer, analytics tags, product analytics).
///
/// Called synchronously for every dispatched event. Failures are caught per
/// exporter and never reach other exporters or the backend path.
pub trait IExporter: Send + Sync {
    fn name(&self) -> &str;
    fn export(&self, event: &EnrichedEvent) -> Result<(), ExportError>;
}
