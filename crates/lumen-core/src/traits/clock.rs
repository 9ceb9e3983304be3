use chrono::{DateTime, Utc};

/// Wall-clock source. Injected so breaker cooldowns can be tested.
pub trait IClock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
