//! Fixed-step simulation clock.
//!
//! Turns the jittery real time between activations into a whole number of
//! fixed physics steps. Simulated time is scaled by `2^speed_exponent` on
//! integer nanoseconds, so any chunking of the same interval yields the same
//! step count. The sub-step remainder carries over to the next activation.

use std::time::Duration;
use tokio::time::Instant;

pub struct StepClock {
    physics_step: Duration,
    max_elapsed: Duration,
    last_update: Instant,
    /// Simulated time not yet consumed by a whole step
    remainder: Duration,
}

impl StepClock {
    pub fn new(physics_step: Duration, max_elapsed: Duration, now: Instant) -> Self {
        Self {
            physics_step,
            max_elapsed,
            last_update: now,
            remainder: Duration::ZERO,
        }
    }

    pub fn physics_step(&self) -> Duration {
        self.physics_step
    }

    /// Real time since the previous activation, capped by the stall guard.
    /// Anything above the cap is dropped, not deferred.
    pub fn elapsed_real(&mut self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.last_update);
        self.last_update = now;
        elapsed.min(self.max_elapsed)
    }

    /// Number of whole physics steps to run for `elapsed_real` at the given speed.
    pub fn steps_for(&mut self, elapsed_real: Duration, speed_exponent: i32) -> u64 {
        let total = self.remainder.as_nanos() + scale_nanos(elapsed_real.as_nanos(), speed_exponent);
        let step = self.physics_step.as_nanos().max(1);
        let steps = total / step;
        self.remainder = Duration::from_nanos((total % step) as u64);
        steps as u64
    }
}

fn scale_nanos(nanos: u128, speed_exponent: i32) -> u128 {
    if speed_exponent >= 0 {
        nanos << speed_exponent
    } else {
        nanos >> speed_exponent.unsigned_abs()
    }
}
