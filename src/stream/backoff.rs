//! Exponential backoff with jitter for reconnection

use rand::Rng;
use std::time::Duration;

/// Exponential backoff state for reconnection attempts.
///
/// Delays grow as `initial * factor^(n-1)` for the n-th attempt, capped at
/// `max`. With jitter enabled each delay is reduced by a uniform random
/// amount of up to 30% of its value. A successful connection resets the
/// attempt counter via [`Backoff::reset`].
#[derive(Debug)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    factor: f64,
    jitter: bool,
    attempt: u32,
}

impl Backoff {
    /// Create a new backoff starting at `initial` with a cap of `max`.
    pub fn new(initial: Duration, max: Duration, factor: f64, jitter: bool) -> Self {
        Self {
            initial,
            max,
            factor,
            jitter,
            attempt: 0,
        }
    }

    /// Advance to the next attempt and return its 1-based number together
    /// with the delay to wait before it.
    pub fn next(&mut self) -> (u32, Duration) {
        self.attempt = self.attempt.saturating_add(1);

        let exp = self.initial.as_millis() as f64 * self.factor.powi(self.attempt as i32 - 1);
        let capped = exp.min(self.max.as_millis() as f64);

        let delay_ms = if self.jitter {
            // Shave off up to 30% of the computed delay.
            let cut: f64 = rand::thread_rng().gen_range(0.0..0.3);
            capped * (1.0 - cut)
        } else {
            capped
        };

        (self.attempt, Duration::from_millis(delay_ms as u64))
    }

    /// Reset the attempt counter after a successful connection.
    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Number of consecutive failed attempts so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}
