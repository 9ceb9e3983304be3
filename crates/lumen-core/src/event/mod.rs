//! Telemetry event schema: the closed category/action set, caller-facing
//! events, the untyped host record, and the enriched wire payload.

mod category;
mod enriched;

pub use category::{Action, Category};
pub use enriched::EnrichedEvent;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::SchemaError;

/// Free-form event metadata. String values are sanitized before dispatch.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Dispatch priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Dispatched as soon as consent allows.
    #[default]
    High,
    /// Deferred to the idle flush.
    Low,
}

/// A telemetry event as submitted by a caller or an event source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub category: Category,
    pub action: Action,
    pub label: Option<String>,
    pub value: Option<f64>,
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub priority: Priority,
    /// Pinned event id. When absent a fresh id is generated at dispatch.
    #[serde(default)]
    pub event_id: Option<String>,
}

impl Event {
    pub fn new(category: Category, action: Action) -> Self {
        Self {
            category,
            action,
            label: None,
            value: None,
            metadata: None,
            priority: Priority::High,
            event_id: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Insert a single metadata entry, creating the map if needed.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn low_priority(self) -> Self {
        self.with_priority(Priority::Low)
    }

    pub fn with_event_id(mut self, id: impl Into<String>) -> Self {
        self.event_id = Some(id.into());
        self
    }

    pub fn is_low_priority(&self) -> bool {
        self.priority == Priority::Low
    }
}

/// Loosely typed event record as handed over by a host page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    pub category: String,
    pub action: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub event_id: Option<String>,
}

impl TryFrom<RawEvent> for Event {
    type Error = SchemaError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let category: Category = raw.category.parse()?;
        let action: Action = raw.action.parse()?;
        if action.category() != category {
            return Err(SchemaError::ActionMismatch {
                category: raw.category,
                action: raw.action,
            });
        }
        Ok(Event {
            category,
            action,
            label: raw.label,
            value: raw.value,
            metadata: raw.metadata,
            priority: raw.priority.unwrap_or_default(),
            event_id: raw.event_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_event_parses_known_pair() {
        let raw: RawEvent = serde_json::from_value(serde_json::json!({
            "category": "perf",
            "action": "hero_paint",
            "value": 120.0,
            "priority": "low"
        }))
        .unwrap();
        let event = Event::try_from(raw).unwrap();
        assert_eq!(event.category, Category::Perf);
        assert_eq!(event.action, Action::HeroPaint);
        assert_eq!(event.value, Some(120.0));
        assert!(event.is_low_priority());
    }

    #[test]
    fn raw_event_rejects_unknown_strings() {
        let raw = RawEvent {
            category: "marketing".into(),
            action: "hero_paint".into(),
            ..Default::default()
        };
        assert!(matches!(
            Event::try_from(raw),
            Err(SchemaError::UnknownCategory { .. })
        ));

        let raw = RawEvent {
            category: "perf".into(),
            action: "lcp".into(),
            ..Default::default()
        };
        assert!(matches!(
            Event::try_from(raw),
            Err(SchemaError::UnknownAction { .. })
        ));
    }

    #[test]
    fn raw_event_rejects_cross_category_action() {
        let raw = RawEvent {
            category: "heartbeat".into(),
            action: "hero_paint".into(),
            ..Default::default()
        };
        assert!(matches!(
            Event::try_from(raw),
            Err(SchemaError::ActionMismatch { .. })
        ));
    }

    #[test]
    fn priority_defaults_to_high() {
        let event = Event::new(Category::Error, Action::Exception);
        assert_eq!(event.priority, Priority::High);
    }
}
