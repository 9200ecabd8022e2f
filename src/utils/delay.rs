use crate::domain::ports::Sleeper;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest delay a range may produce: one day.
pub const MAX_DELAY_SECS: f64 = 86_400.0;

/// Uniform random delay in `[min_secs, max_secs]`, re-rolled on every call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl DelayRange {
    pub const fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    pub const fn none() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn sample(&self) -> Duration {
        self.sample_with(&mut rand::thread_rng())
    }

    /// Draws are clamped to `[0, MAX_DELAY_SECS]`; NaN bounds yield zero.
    pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let low = self.min_secs.clamp(0.0, MAX_DELAY_SECS);
        let high = self.max_secs.clamp(0.0, MAX_DELAY_SECS);
        let secs = if high > low {
            rng.gen_range(low..=high)
        } else {
            low
        };
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
    }

    pub fn contains(&self, delay: Duration) -> bool {
        let secs = delay.as_secs_f64();
        // f64 -> Duration rounds to whole nanoseconds
        let eps = 1e-9;
        secs + eps >= self.min_secs && secs - eps <= self.max_secs
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_stays_in_range() {
        let range = DelayRange::new(5.0, 10.0);
        for _ in 0..200 {
            let d = range.sample();
            assert!(range.contains(d), "{:?} outside 5..10s", d);
        }
    }

    #[test]
    fn test_degenerate_range_is_fixed() {
        let range = DelayRange::new(2.0, 2.0);
        assert_eq!(range.sample(), Duration::from_secs(2));
        assert_eq!(DelayRange::none().sample(), Duration::ZERO);
    }

    #[test]
    fn test_huge_range_is_clamped_instead_of_panicking() {
        let range = DelayRange::new(1.0, 1e20);
        for _ in 0..50 {
            assert!(range.sample() <= Duration::from_secs_f64(MAX_DELAY_SECS));
        }
        assert_eq!(
            DelayRange::new(1e20, 1e20).sample(),
            Duration::from_secs_f64(MAX_DELAY_SECS)
        );
        assert_eq!(DelayRange::new(-3.0, -3.0).sample(), Duration::ZERO);
    }

    #[test]
    fn test_contains_rejects_outside() {
        let range = DelayRange::new(2.0, 5.0);
        assert!(!range.contains(Duration::from_secs(1)));
        assert!(!range.contains(Duration::from_secs(6)));
        assert!(range.contains(Duration::from_millis(3500)));
    }
}
