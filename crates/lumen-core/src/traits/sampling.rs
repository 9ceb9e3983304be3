/// Uniform random source in `[0, 1)` for the sampler.
pub trait ISampleSource: Send + Sync {
    fn next_unit(&self) -> f64;
}
