use crate::foundation::core::{Canvas, Point};
use crate::foundation::math::{lerp, map_range};

/// Per-frame blend factor toward the pointer-derived color target.
pub const DRIFT_RATE: f64 = 0.02;
/// Starting hue of a fresh drifter.
pub const DEFAULT_HUE: f64 = 180.0;
/// Starting saturation of a fresh drifter.
pub const DEFAULT_SAT: f64 = 60.0;

const SAT_MIN: f64 = 30.0;
const SAT_MAX: f64 = 100.0;

/// How exponential smoothing responds to frame timing.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Smoothing {
    /// Blend a fixed [`DRIFT_RATE`] every frame, whatever the frame duration.
    #[default]
    PerFrame,
    /// Blend `1 - (1 - rate)^(dt * reference_fps)`, which matches `PerFrame` at the reference
    /// frame rate and keeps the visual speed constant at other rates.
    TimeNormalized {
        /// Frame rate at which the blend equals the literal per-frame rate.
        reference_fps: f64,
    },
}

impl Smoothing {
    /// Effective blend factor for a frame lasting `dt` seconds.
    pub fn blend(self, rate: f64, dt: f64) -> f64 {
        match self {
            Smoothing::PerFrame => rate,
            Smoothing::TimeNormalized { reference_fps } => {
                if !dt.is_finite() || dt <= 0.0 {
                    return 0.0;
                }
                1.0 - (1.0 - rate).powf(dt * reference_fps)
            }
        }
    }
}

/// Hue/saturation state smoothed toward a target derived from the pointer position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorDrifter {
    hue: f64,
    sat: f64,
}

impl ColorDrifter {
    /// Start at `hue` (wrapped into `[0, 360)`) and `sat`.
    pub fn new(hue: f64, sat: f64) -> Self {
        Self {
            hue: hue.rem_euclid(360.0),
            sat,
        }
    }

    /// Current hue in degrees.
    pub fn hue(&self) -> f64 {
        self.hue
    }

    /// Current saturation, 0..100.
    pub fn sat(&self) -> f64 {
        self.sat
    }

    /// Target `(hue, sat)` for a pointer in surface coordinates.
    pub fn target(pointer: Point, canvas: Canvas) -> (f64, f64) {
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        (
            map_range(pointer.x, 0.0, w, 0.0, 360.0),
            map_range(pointer.y, 0.0, h, SAT_MIN, SAT_MAX),
        )
    }

    /// Blend toward the pointer target using the literal per-frame rate.
    pub fn advance(&mut self, pointer: Point, canvas: Canvas) {
        self.advance_with(pointer, canvas, DRIFT_RATE);
    }

    /// Blend toward the pointer target with an explicit blend factor in `(0, 1)`.
    pub fn advance_with(&mut self, pointer: Point, canvas: Canvas, blend: f64) {
        let (target_hue, target_sat) = Self::target(pointer, canvas);
        self.hue = lerp(self.hue, target_hue, blend);
        self.sat = lerp(self.sat, target_sat, blend);
    }
}

impl Default for ColorDrifter {
    fn default() -> Self {
        Self::new(DEFAULT_HUE, DEFAULT_SAT)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/color.rs"]
mod tests;
