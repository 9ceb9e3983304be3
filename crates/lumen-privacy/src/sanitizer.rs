use std::collections::HashSet;

use lumen_core::Metadata;
use serde_json::Value;

use crate::patterns;

/// Counts from a single sanitization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    /// String values that had at least one address replaced.
    pub redacted_values: usize,
    /// String values left untouched because their key is whitelisted.
    pub whitelisted_values: usize,
}

/// Redacts email addresses from metadata values.
///
/// Nested objects and arrays are walked; a whitelisted key exempts its whole
/// subtree.
#[derive(Debug, Clone, Default)]
pub struct MetadataSanitizer {
    whitelist: HashSet<String>,
}

impl MetadataSanitizer {
    pub fn new<I, S>(whitelist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            whitelist: whitelist.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_whitelisted(&self, key: &str) -> bool {
        self.whitelist.contains(key)
    }

    pub fn sanitize(&self, metadata: &Metadata) -> Metadata {
        self.sanitize_with_report(metadata).0
    }

    pub fn sanitize_with_report(&self, metadata: &Metadata) -> (Metadata, SanitizeReport) {
        let mut report = SanitizeReport::default();
        let cleaned = metadata
            .iter()
            .map(|(key, value)| {
                let value = if self.is_whitelisted(key) {
                    report.whitelisted_values += count_strings(value);
                    value.clone()
                } else {
                    scrub(value, &mut report)
                };
                (key.clone(), value)
            })
            .collect();
        if report.redacted_values > 0 {
            tracing::debug!(
                redacted = report.redacted_values,
                "privacy: redacted email addresses from metadata"
            );
        }
        (cleaned, report)
    }
}

fn scrub(value: &Value, report: &mut SanitizeReport) -> Value {
    match value {
        Value::String(s) => {
            let redacted = patterns::redact_emails(s);
            if redacted != s.as_str() {
                report.redacted_values += 1;
            }
            Value::String(redacted.into_owned())
        }
        Value::Array(items) => Value::Array(items.iter().map(|v| scrub(v, report)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), scrub(v, report)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn count_strings(value: &Value) -> usize {
    match value {
        Value::String(_) => 1,
        Value::Array(items) => items.iter().map(count_strings).sum(),
        Value::Object(map) => map.values().map(count_strings).sum(),
        _ => 0,
    }
}
