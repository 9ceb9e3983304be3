use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// A deferred unit of work (idle flush, backend re-flush).
pub type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Timer abstraction standing in for idle callbacks and timeouts.
pub trait IScheduler: Send + Sync {
    /// Run `job` after `delay`. Implementations must not block the caller.
    fn schedule(&self, delay: Duration, job: Job);
}
