//! Exponential backoff bounded by an elapsed-time budget.
//!
//! The schedule is pure: [`Backoff::next_delay`] only reads the injected
//! [`Clock`], so tests drive it with a [`ManualClock`] instead of real sleeps.

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use async_trait::async_trait;
use rand::Rng;

#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by tokio timers.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Virtual clock: `sleep` returns at once and advances `now` by the requested
/// duration. Every requested sleep is recorded.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualClockInner>>,
}

#[derive(Debug)]
struct ManualClockInner {
    origin: Instant,
    offset: Duration,
    sleeps: Vec<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualClockInner {
                origin: Instant::now(),
                offset: Duration::ZERO,
                sleeps: Vec::new(),
            })),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.inner.lock().expect("ManualClock poisoned").offset += by;
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.inner.lock().expect("ManualClock poisoned").sleeps.clone()
    }

    pub fn elapsed(&self) -> Duration {
        self.inner.lock().expect("ManualClock poisoned").offset
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let inner = self.inner.lock().expect("ManualClock poisoned");
        inner.origin + inner.offset
    }

    async fn sleep(&self, duration: Duration) {
        let mut inner = self.inner.lock().expect("ManualClock poisoned");
        inner.offset += duration;
        inner.sleeps.push(duration);
    }
}

/// Out-of-range values never panic: a NaN or negative `multiplier` keeps the
/// delay constant, an overflowing product is capped at `max_interval`, and a
/// NaN or non-positive `jitter` disables randomization.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    /// Growth factor per retry, expected to be `>= 1.0`.
    pub multiplier: f64,
    /// Upper bound for a single delay before jitter.
    pub max_interval: Duration,
    /// Total time budget for one retry loop, measured from its first attempt.
    pub max_elapsed: Duration,
    /// Randomization factor in `[0, 1)`; a delay `d` becomes uniform in
    /// `[d * (1 - j), d * (1 + j)]`.
    pub jitter: Option<f64>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(500),
            multiplier: 1.5,
            max_interval: Duration::from_secs(60),
            max_elapsed: Duration::from_secs(30),
            jitter: Some(0.5),
        }
    }
}

impl RetryPolicy {
    /// Budget of `max_retries * 10s`, the rest as [`RetryPolicy::default`].
    pub fn from_max_retries(max_retries: u32) -> Self {
        Self {
            max_elapsed: Duration::from_secs(10) * max_retries,
            ..Self::default()
        }
    }

    pub fn without_jitter(mut self) -> Self {
        self.jitter = None;
        self
    }

    /// Starts a fresh schedule; the elapsed-time counter begins now.
    pub fn start<'a>(&'a self, clock: &'a dyn Clock) -> Backoff<'a> {
        Backoff {
            policy: self,
            clock,
            started: clock.now(),
            current: self.base_delay,
        }
    }
}

/// One retry loop's view of a [`RetryPolicy`].
pub struct Backoff<'a> {
    policy: &'a RetryPolicy,
    clock: &'a dyn Clock,
    started: Instant,
    current: Duration,
}

impl Backoff<'_> {
    /// Delay before the next attempt, or `None` once waiting it would
    /// overrun the elapsed-time budget.
    pub fn next_delay(&mut self) -> Option<Duration> {
        let elapsed = self.clock.now().saturating_duration_since(self.started);
        let delay = match self.policy.jitter {
            Some(factor) if factor > 0.0 => randomize(self.current, factor),
            _ => self.current,
        };

        if elapsed.saturating_add(delay) > self.policy.max_elapsed {
            return None;
        }

        self.current = grow(self.current, self.policy.multiplier, self.policy.max_interval);
        Some(delay)
    }
}

fn grow(current: Duration, multiplier: f64, cap: Duration) -> Duration {
    if multiplier.is_nan() || multiplier < 0.0 {
        return current.min(cap);
    }
    scale(current, multiplier).map_or(cap, |next| next.min(cap))
}

fn randomize(delay: Duration, factor: f64) -> Duration {
    let factor = factor.min(1.0);
    let ratio = rand::thread_rng().gen_range((1.0 - factor)..=(1.0 + factor));
    scale(delay, ratio).unwrap_or(Duration::MAX)
}

/// `d * by`, or `None` when the product is not a representable duration.
fn scale(d: Duration, by: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(d.as_secs_f64() * by).ok()
}
