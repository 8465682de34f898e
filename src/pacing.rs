//! Pacing policy between products to stay under the endpoint's abuse radar.

use rand::RngExt;
use std::time::Duration;

/// Computes the pause to take after each processed product.
///
/// Returns plain `Duration`s instead of sleeping so callers (and tests)
/// control the actual wait.
#[derive(Debug, Clone)]
pub struct Pacer {
    short: (u64, u64),
    long: (u64, u64),
    long_every: usize,
}

impl Pacer {
    pub fn new(short: (u64, u64), long: (u64, u64), long_every: usize) -> Self {
        Self { short, long, long_every }
    }

    /// A pacer that never waits, for tests and dry runs.
    pub fn disabled() -> Self {
        Self { short: (0, 0), long: (0, 0), long_every: usize::MAX }
    }

    /// Pause to take after the `processed`-th product (1-indexed).
    ///
    /// Every `long_every`-th product earns the long cooldown; the rest get
    /// the short jittered pause.
    pub fn pause_after(&self, processed: usize) -> Duration {
        let (lo, hi) = if self.long_every != 0 && processed > 0 && processed % self.long_every == 0
        {
            self.long
        } else {
            self.short
        };

        if hi == 0 {
            return Duration::ZERO;
        }

        let secs = rand::rng().random_range(lo..=hi);
        Duration::from_secs(secs)
    }
}

impl From<&crate::config::Config> for Pacer {
    fn from(config: &crate::config::Config) -> Self {
        Self::new(config.short_pause_secs, config.long_pause_secs, config.long_pause_every)
    }
}
