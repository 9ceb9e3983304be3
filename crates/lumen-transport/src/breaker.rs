//! Circuit breaker over consecutive delivery failures.
//!
//! Closed → (threshold failures) → Open → (cooldown elapsed) → half-open.
//! Half-open is not stored: it is an open breaker whose cooldown has run out.
//! The next outcome either closes it or re-opens it with a fresh timestamp.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Observable breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

/// Serializable view of the breaker for the debug snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakerSnapshot {
    pub state: BreakerState,
    pub consecutive_failures: u32,
    pub threshold: u32,
    pub cooldown_ms: u64,
    pub opened_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    threshold: u32,
    cooldown: Duration,
    consecutive_failures: u32,
    opened_at: Option<DateTime<Utc>>,
}

impl CircuitBreaker {
    pub fn new(threshold: u32, cooldown: Duration) -> Self {
        Self {
            threshold: threshold.max(1),
            cooldown,
            consecutive_failures: 0,
            opened_at: None,
        }
    }

    /// Change limits without touching the current failure count or open state.
    pub fn reconfigure(&mut self, threshold: u32, cooldown: Duration) {
        self.threshold = threshold.max(1);
        self.cooldown = cooldown;
    }

    pub fn state(&self, now: DateTime<Utc>) -> BreakerState {
        match self.opened_at {
            None => BreakerState::Closed,
            Some(opened_at) if self.cooldown_elapsed(opened_at, now) => BreakerState::HalfOpen,
            Some(_) => BreakerState::Open,
        }
    }

    /// Whether a delivery attempt may go out now.
    pub fn allows_attempt(&self, now: DateTime<Utc>) -> bool {
        self.state(now) != BreakerState::Open
    }

    pub fn is_open(&self) -> bool {
        self.opened_at.is_some()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Record a successful attempt. Returns true if this closed an open breaker.
    pub fn record_success(&mut self) -> bool {
        let was_open = self.opened_at.take().is_some();
        self.consecutive_failures = 0;
        was_open
    }

    /// Record a failed attempt. Returns true if this opened (or re-opened) the breaker.
    pub fn record_failure(&mut self, now: DateTime<Utc>) -> bool {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        if self.opened_at.is_some() || self.consecutive_failures >= self.threshold {
            self.opened_at = Some(now);
            return true;
        }
        false
    }

    /// Time left until the breaker turns half-open. `None` when it is closed
    /// or already half-open.
    pub fn remaining_cooldown(&self, now: DateTime<Utc>) -> Option<Duration> {
        let opened_at = self.opened_at?;
        if self.cooldown_elapsed(opened_at, now) {
            return None;
        }
        let elapsed = (now - opened_at).to_std().unwrap_or(Duration::ZERO);
        Some(self.cooldown.saturating_sub(elapsed) + Duration::from_millis(1))
    }

    /// Backdate the open timestamp so the next check is half-open.
    /// No effect on a closed breaker.
    pub fn force_half_open(&mut self, now: DateTime<Utc>) {
        if self.opened_at.is_some() {
            let cooldown = chrono::Duration::from_std(self.cooldown)
                .unwrap_or_else(|_| chrono::Duration::zero());
            self.opened_at = Some(now - cooldown - chrono::Duration::milliseconds(1));
        }
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> BreakerSnapshot {
        BreakerSnapshot {
            state: self.state(now),
            consecutive_failures: self.consecutive_failures,
            threshold: self.threshold,
            cooldown_ms: self.cooldown.as_millis() as u64,
            opened_at: self.opened_at,
        }
    }

    fn cooldown_elapsed(&self, opened_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match (now - opened_at).to_std() {
            Ok(elapsed) => elapsed > self.cooldown,
            // Clock went backwards; stay open.
            Err(_) => false,
        }
    }
}
