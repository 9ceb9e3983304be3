use lumen_core::errors::ExportError;
use lumen_core::traits::IExporter;
use lumen_core::EnrichedEvent;

/// Logs every dispatched event at debug level under `lumen::export`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingExporter;

impl IExporter for TracingExporter {
    fn name(&self) -> &str {
        "tracing"
    }

    fn export(&self, event: &EnrichedEvent) -> Result<(), ExportError> {
        tracing::debug!(
            target: "lumen::export",
            event_id = %event.event_id,
            category = %event.event_category,
            action = %event.event_action,
            label = event.event_label.as_deref().unwrap_or(""),
            value = event.event_value,
            priority = ?event.priority,
            "dispatched"
        );
        Ok(())
    }
}
