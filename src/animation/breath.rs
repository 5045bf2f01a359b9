use std::f64::consts::TAU;

use crate::foundation::error::{BreatheError, BreatheResult};

/// Default breathing speed: one full breath every eight seconds.
pub const DEFAULT_BREATH_SPEED: f64 = 1.0 / 8.0;

/// Phase accumulator producing the breathing signal.
///
/// The phase always stays in `[0, 1)`. Each advance subtracts one full cycle when the phase
/// reaches one; if a single `dt` spike carries the phase more than one cycle past the wrap,
/// the oscillator falls back to a true modulo for that step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BreathOscillator {
    phase: f64,
    speed: f64,
}

impl BreathOscillator {
    /// Create an oscillator with `speed` in cycles per second, starting at `phase`.
    pub fn new(speed: f64, phase: f64) -> BreatheResult<Self> {
        if !speed.is_finite() || speed < 0.0 {
            return Err(BreatheError::config(format!(
                "breath speed must be finite and >= 0 (got {speed})"
            )));
        }
        if !phase.is_finite() {
            return Err(BreatheError::config("breath phase must be finite"));
        }
        Ok(Self {
            phase: phase.rem_euclid(1.0),
            speed,
        })
    }

    /// Position within the current cycle, in `[0, 1)`.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Cycles per second.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Advance by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.phase += self.speed * dt;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        if self.phase >= 1.0 {
            tracing::debug!(
                phase = self.phase,
                dt,
                "breath step exceeded a full cycle; wrapping with modulo"
            );
            self.phase = self.phase.rem_euclid(1.0);
        }
    }

    /// Current breathing value, `0.3 + 0.7 * sin(2π·phase)`, in `[-0.4, 1.0]`.
    pub fn value(&self) -> f64 {
        breath_value(self.phase)
    }
}

impl Default for BreathOscillator {
    fn default() -> Self {
        Self {
            phase: 0.0,
            speed: DEFAULT_BREATH_SPEED,
        }
    }
}

/// Breathing value for a raw phase.
pub fn breath_value(phase: f64) -> f64 {
    0.3 + 0.7 * (TAU * phase).sin()
}

#[cfg(test)]
#[path = "../../tests/unit/animation/breath.rs"]
mod tests;
