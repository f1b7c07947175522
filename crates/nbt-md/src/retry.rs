//! Bounded retry with escalating delay around any [`DailyRecordLoader`].
//!
//! Only [`LoadError::Transient`] is retried. Sleeping goes through
//! [`Sleeper`] so tests can record delays instead of waiting.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use nbt_trend::{DailyRecordLoader, LoadError, RawTradeRow};
use tracing::warn;

/// Attempt budget and delay schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; `0` behaves as `1`.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Delay after failed attempt `attempt` (1-based): `base * 2^(attempt-1)`,
    /// capped at `max_delay`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

pub trait Sleeper: Send + Sync {
    fn sleep(&self, d: Duration);
}

/// Blocks the current thread. Loaders run on blocking workers, so this is safe.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, d: Duration) {
        std::thread::sleep(d);
    }
}

pub struct RetryingLoader<L> {
    inner: L,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl<L: DailyRecordLoader> RetryingLoader<L> {
    pub fn new(inner: L, policy: RetryPolicy) -> Self {
        Self::with_sleeper(inner, policy, Arc::new(ThreadSleeper))
    }

    pub fn with_sleeper(inner: L, policy: RetryPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            inner,
            policy,
            sleeper,
        }
    }
}

impl<L: DailyRecordLoader> DailyRecordLoader for RetryingLoader<L> {
    fn load(&self, date: NaiveDate) -> Result<Vec<RawTradeRow>, LoadError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.inner.load(date) {
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = self.policy.delay_after(attempt);
                    warn!(%date, attempt, max_attempts, ?delay, error = %e, "daily load failed; retrying");
                    self.sleeper.sleep(delay);
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}
