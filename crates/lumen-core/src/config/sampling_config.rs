use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::event::Category;

/// Per-category sampling rates. Categories without an entry are always kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub rates: BTreeMap<Category, f64>,
}

impl SamplingConfig {
    /// A table that keeps everything.
    pub fn keep_all() -> Self {
        Self {
            rates: BTreeMap::new(),
        }
    }

    pub fn with_rate(mut self, category: Category, rate: f64) -> Self {
        self.rates.insert(category, rate);
        self
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        let mut rates = BTreeMap::new();
        rates.insert(Category::Heartbeat, defaults::DEFAULT_HEARTBEAT_SAMPLE_RATE);
        Self { rates }
    }
}
