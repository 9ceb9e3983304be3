//! Per-category probabilistic sampling.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use lumen_core::config::SamplingConfig;
use lumen_core::traits::ISampleSource;
use lumen_core::Category;
use rand::Rng;

/// Thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandSampleSource;

impl ISampleSource for RandSampleSource {
    fn next_unit(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Replays a fixed sequence of draws, cycling. Empty means always `0.0`.
#[derive(Debug, Default)]
pub struct FixedSampleSource {
    draws: Vec<f64>,
    next: Mutex<usize>,
}

impl FixedSampleSource {
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        Self {
            draws: draws.into(),
            next: Mutex::new(0),
        }
    }
}

impl ISampleSource for FixedSampleSource {
    fn next_unit(&self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let mut next = self.next.lock().unwrap_or_else(|e| e.into_inner());
        let draw = self.draws[*next % self.draws.len()];
        *next += 1;
        draw
    }
}

/// Keeps an event of category `c` with probability `rates[c]` (default 1.0).
pub struct Sampler {
    rates: BTreeMap<Category, f64>,
    source: Arc<dyn ISampleSource>,
}

impl std::fmt::Debug for Sampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sampler").field("rates", &self.rates).finish()
    }
}

impl Sampler {
    pub fn new(config: &SamplingConfig, source: Box<dyn ISampleSource>) -> Self {
        let mut sampler = Self {
            rates: BTreeMap::new(),
            source: Arc::from(source),
        };
        sampler.set_rates(config);
        sampler
    }

    /// Replace the rate table. Rates are clamped to `[0, 1]`; NaN counts as 0.
    pub fn set_rates(&mut self, config: &SamplingConfig) {
        self.rates = config
            .rates
            .iter()
            .map(|(category, rate)| (*category, clamp_rate(*rate)))
            .collect();
    }

    pub fn rate(&self, category: Category) -> f64 {
        self.rates.get(&category).copied().unwrap_or(1.0)
    }

    pub fn rates(&self) -> &BTreeMap<Category, f64> {
        &self.rates
    }

    /// Shared handle to the random source, for drawing outside whatever lock
    /// guards this sampler.
    pub fn source(&self) -> Arc<dyn ISampleSource> {
        Arc::clone(&self.source)
    }

    /// Decide whether to keep an event. Rates of 1 and 0 never draw.
    pub fn should_sample(&self, category: Category) -> bool {
        keep(self.rate(category), self.source.as_ref())
    }
}

/// Keep with probability `rate`, drawing from `source` only when the rate is
/// strictly between 0 and 1.
pub fn keep(rate: f64, source: &dyn ISampleSource) -> bool {
    if rate >= 1.0 {
        return true;
    }
    if rate <= 0.0 {
        return false;
    }
    source.next_unit() < rate
}

fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingSource(Arc<AtomicUsize>);

    impl ISampleSource for CountingSource {
        fn next_unit(&self) -> f64 {
            self.0.fetch_add(1, Ordering::SeqCst);
            0.5
        }
    }

    #[test]
    fn full_rate_never_draws() {
        let draws = Arc::new(AtomicUsize::new(0));
        let sampler = Sampler::new(
            &SamplingConfig::keep_all(),
            Box::new(CountingSource(draws.clone())),
        );
        for category in Category::ALL {
            assert!(sampler.should_sample(category));
        }
        assert_eq!(draws.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn default_table_halves_heartbeat() {
        let sampler = Sampler::new(
            &SamplingConfig::default(),
            Box::new(FixedSampleSource::new(vec![0.49, 0.5, 0.99])),
        );
        assert!(sampler.should_sample(Category::Heartbeat));
        assert!(!sampler.should_sample(Category::Heartbeat));
        assert!(!sampler.should_sample(Category::Heartbeat));
        assert!(sampler.should_sample(Category::Interaction));
    }

    #[test]
    fn rates_are_clamped() {
        let config = SamplingConfig::keep_all()
            .with_rate(Category::Perf, 7.0)
            .with_rate(Category::Intro, -1.0)
            .with_rate(Category::Config, f64::NAN);
        let sampler = Sampler::new(&config, Box::new(FixedSampleSource::new(vec![0.0])));
        assert_eq!(sampler.rate(Category::Perf), 1.0);
        assert!(!sampler.should_sample(Category::Intro));
        assert!(!sampler.should_sample(Category::Config));
    }
}
