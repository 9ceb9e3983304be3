use std::sync::{Arc, Mutex};

use lumen_core::errors::ExportError;
use lumen_core::traits::IExporter;
use lumen_core::EnrichedEvent;
use serde_json::{json, Value};

/// Appends tag-manager style records to a shared list, the way a page
/// pushes onto `window.dataLayer`.
///
/// Each record is `{"event": "lumen_event", "category", "action", "label",
/// "value", "eventId"}`. Metadata is not forwarded.
#[derive(Debug, Clone, Default)]
pub struct DataLayerExporter {
    layer: Arc<Mutex<Vec<Value>>>,
}

impl DataLayerExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share an existing layer with other code.
    pub fn with_layer(layer: Arc<Mutex<Vec<Value>>>) -> Self {
        Self { layer }
    }

    pub fn layer(&self) -> Arc<Mutex<Vec<Value>>> {
        Arc::clone(&self.layer)
    }

    pub fn records(&self) -> Vec<Value> {
        self.layer.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl IExporter for DataLayerExporter {
    fn name(&self) -> &str {
        "data_layer"
    }

    fn export(&self, event: &EnrichedEvent) -> Result<(), ExportError> {
        let record = json!({
            "event": "lumen_event",
            "category": event.event_category,
            "action": event.event_action,
            "label": event.event_label,
            "value": event.event_value,
            "eventId": event.event_id,
        });
        self.layer
            .lock()
            .map_err(|_| ExportError::Failed {
                exporter: self.name().to_string(),
                reason: "data layer lock poisoned".into(),
            })?
            .push(record);
        Ok(())
    }
}
