//! AIMD rate controller.
//!
//! [`RateController`] owns the sender's one adaptive variable: the target
//! transmission rate in packets per second. It is driven by exactly two
//! events, both triggered from the sender loop:
//!
//! - a pacing query before each send ([`pacing_interval`](RateController::pacing_interval)),
//! - a loss report from the receiver ([`on_feedback`](RateController::on_feedback)),
//!   which applies one additive-increase or multiplicative-decrease step.
//!
//! The rate is clamped to `[MIN_RATE, MAX_RATE]` after every adjustment.
//! No hysteresis, no smoothing: one feedback message, one step.

use std::time::Duration;

use crate::constants::{ALPHA, BETA, LOSS_THRESHOLD, MAX_RATE, MIN_RATE};

/// Direction a feedback message moved the rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Loss at or below the threshold: rate increased by [`ALPHA`].
    Increase,
    /// Loss strictly above the threshold: rate multiplied by [`BETA`].
    Decrease,
}

/// Sender-side adaptive rate state.
#[derive(Debug, Clone)]
pub struct RateController {
    current: u32,
}

impl RateController {
    /// Start at `initial` packets/second, clamped into the legal range.
    pub fn new(initial: u32) -> Self {
        Self {
            current: initial.clamp(MIN_RATE, MAX_RATE),
        }
    }

    /// Current target rate in packets/second.
    pub fn rate(&self) -> u32 {
        self.current
    }

    /// Spacing between consecutive sends at the current rate.
    ///
    /// The rate is clamped to [`MIN_RATE`] before dividing, so the interval
    /// is always finite and at most `1/MIN_RATE` seconds.
    pub fn pacing_interval(&self) -> Duration {
        let rate = self.current.max(MIN_RATE);
        Duration::from_micros(1_000_000 / u64::from(rate))
    }

    /// Apply one AIMD step for a reported loss rate.
    ///
    /// Strictly-above-threshold loss halves the rate (floored at
    /// [`MIN_RATE`]); anything else adds [`ALPHA`] (capped at [`MAX_RATE`]).
    pub fn on_feedback(&mut self, loss_rate: f64) -> Adjustment {
        if loss_rate > LOSS_THRESHOLD {
            self.current = ((f64::from(self.current) * BETA) as u32).max(MIN_RATE);
            Adjustment::Decrease
        } else {
            self.current = (self.current + ALPHA).min(MAX_RATE);
            Adjustment::Increase
        }
    }
}

impl Default for RateController {
    fn default() -> Self {
        Self::new(crate::constants::INITIAL_RATE)
    }
}
