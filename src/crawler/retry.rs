//! Retry schedule and injectable sleeping
//!
//! The retry loop itself lives in the fetcher; this module holds the pure
//! delay calculations and the [`Sleeper`] seam that lets tests observe the
//! schedule without waiting for it.

use crate::config::RequestConfig;
use crate::crawler::fetcher::FetchError;
use rand::Rng;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Extra wait range (seconds) added to the backoff after an HTTP 503
const SERVICE_UNAVAILABLE_JITTER_SECS: (f64, f64) = (1.0, 3.0);

/// Bounded retry policy for a single URL
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Politeness delay lower bound
    pub min_delay: Duration,

    /// Politeness delay upper bound
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RequestConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &RequestConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            min_delay: Duration::from_millis(config.min_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }

    /// Random wait before an attempt, uniform over `[min_delay, max_delay]`
    pub fn politeness_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max_delay <= self.min_delay {
            return self.min_delay;
        }
        let secs = rng.gen_range(self.min_delay.as_secs_f64()..=self.max_delay.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    /// Wait after a failed attempt (0-indexed): `2^attempt` seconds, plus
    /// 1..=3 seconds of jitter when the server answered 503
    pub fn backoff_delay<R: Rng + ?Sized>(
        &self,
        attempt: u32,
        error: &FetchError,
        rng: &mut R,
    ) -> Duration {
        let base = 2f64.powi(attempt as i32);
        let jitter = if error.is_service_unavailable() {
            let (low, high) = SERVICE_UNAVAILABLE_JITTER_SECS;
            rng.gen_range(low..=high)
        } else {
            0.0
        };
        Duration::from_secs_f64(base + jitter)
    }

    /// Network failures skip the wait after the final attempt; status
    /// failures always wait
    pub fn should_wait_after(&self, attempt: u32, error: &FetchError) -> bool {
        !(error.is_network() && self.is_final_attempt(attempt))
    }

    pub fn is_final_attempt(&self, attempt: u32) -> bool {
        attempt + 1 >= self.max_attempts
    }
}

/// Suspends the current task for a duration
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Real sleeping on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// Records requested durations and returns immediately
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    log: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Durations requested so far, in order
    pub fn recorded(&self) -> Vec<Duration> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        if let Ok(mut log) = self.log.lock() {
            log.push(duration);
        }
        std::future::ready(())
    }
}
