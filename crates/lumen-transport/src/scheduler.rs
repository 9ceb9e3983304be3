//! Timer implementations for idle flushes and backend re-flushes.

use std::sync::Mutex;
use std::time::Duration;

use lumen_core::traits::{IScheduler, Job};

/// Spawns each job on the current tokio runtime after its delay.
///
/// Outside a runtime the job is dropped; the next `track` or explicit flush
/// picks up whatever it would have done.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl IScheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, job: Job) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    job.await;
                });
            }
            Err(_) => {
                tracing::debug!(
                    delay_ms = delay.as_millis() as u64,
                    "scheduler: no tokio runtime, dropping job"
                );
            }
        }
    }
}

/// Records jobs instead of running them. Tests drive them with [`run_all`].
///
/// [`run_all`]: ManualScheduler::run_all
#[derive(Default)]
pub struct ManualScheduler {
    jobs: Mutex<Vec<(Duration, Job)>>,
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of jobs waiting to run.
    pub fn pending(&self) -> usize {
        self.jobs.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Delays of the pending jobs, in scheduling order.
    pub fn delays(&self) -> Vec<Duration> {
        self.jobs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(delay, _)| *delay)
            .collect()
    }

    /// Drop every pending job without running it.
    pub fn clear(&self) {
        self.jobs.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    /// Run the jobs pending at call time, in order. Jobs they schedule stay
    /// pending for the next call. Returns how many ran.
    pub async fn run_all(&self) -> usize {
        let jobs = std::mem::take(&mut *self.jobs.lock().unwrap_or_else(|e| e.into_inner()));
        let count = jobs.len();
        for (_, job) in jobs {
            job.await;
        }
        count
    }
}

impl IScheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, job: Job) {
        self.jobs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((delay, job));
    }
}
