//! Retry loop with exponential backoff around a single batch POST.

use std::time::Duration;

use lumen_core::errors::TransportError;
use lumen_core::traits::{DeliveryRequest, IDeliveryClient};
use lumen_observability::tracing_setup::events;

/// How many times, and how far apart, a transient failure is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first.
    pub max_retries: u32,
    /// Delay before retry `n` (0-based) is `base_delay * 2^n`.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// A single attempt, no retries.
    pub fn once() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Backoff after the failed attempt with 0-based index `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

/// Result of delivering one batch through the retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// A 2xx arrived.
    Delivered { status: u16, attempts: u32 },
    /// A non-retryable failure; the batch must not be resent.
    Permanent {
        error: TransportError,
        attempts: u32,
    },
    /// Every attempt failed with a retryable error.
    Exhausted {
        error: TransportError,
        attempts: u32,
    },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::Delivered { attempts, .. }
            | Self::Permanent { attempts, .. }
            | Self::Exhausted { attempts, .. } => *attempts,
        }
    }
}

fn classify(result: Result<u16, TransportError>) -> Result<u16, TransportError> {
    match result {
        Ok(status) if (200..300).contains(&status) => Ok(status),
        Ok(status) => Err(TransportError::HttpStatus { status }),
        Err(e) => Err(e),
    }
}

/// POST `request`, retrying transient failures per `policy`.
///
/// The backoff sleep is the only suspension point besides the send itself.
pub async fn deliver_with_retry<C: IDeliveryClient>(
    client: &C,
    request: DeliveryRequest,
    policy: RetryPolicy,
) -> DeliveryOutcome {
    let mut attempts = 0;
    loop {
        attempts += 1;
        match classify(client.send(request.clone()).await) {
            Ok(status) => return DeliveryOutcome::Delivered { status, attempts },
            Err(error) if !error.is_retryable() => {
                return DeliveryOutcome::Permanent { error, attempts };
            }
            Err(error) => {
                let attempt = attempts - 1;
                if attempt >= policy.max_retries {
                    return DeliveryOutcome::Exhausted { error, attempts };
                }
                let delay = policy.delay_for(attempt);
                events::delivery_retry(
                    attempts,
                    policy.max_retries,
                    delay.as_millis() as u64,
                    &error.to_string(),
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_doubles() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1000));
        assert_eq!(policy.delay_for(0), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(1), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(4000));
    }

    #[test]
    fn delay_saturates() {
        let policy = RetryPolicy::new(3, Duration::from_secs(1));
        assert!(policy.delay_for(64) >= Duration::from_secs(u32::MAX as u64));
    }

    #[test]
    fn non_2xx_becomes_status_error() {
        assert_eq!(classify(Ok(204)), Ok(204));
        assert_eq!(
            classify(Ok(302)),
            Err(TransportError::HttpStatus { status: 302 })
        );
    }
}
