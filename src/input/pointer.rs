use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{BreatheError, BreatheResult};
use crate::foundation::math::lerp;
use std::f64::consts::TAU;

/// Scripted pointer for headless rendering.
///
/// Coordinates are normalized to the canvas (`[0, 1]` on each axis) so a path keeps its
/// meaning across resizes. Evaluated positions are clamped to the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerPath {
    /// Pointer never set: resolves to the canvas center.
    #[default]
    Center,
    /// Pointer held at one position.
    Fixed {
        /// Normalized x.
        x: f64,
        /// Normalized y.
        y: f64,
    },
    /// Circle around the canvas center; `radius` is a fraction of each axis.
    Orbit {
        /// Orbit radius as a fraction of each axis.
        radius: f64,
        /// Seconds per revolution, > 0.
        period_secs: f64,
    },
    /// Linear move from `from` to `to`, then held at `to`.
    Sweep {
        /// Normalized start position.
        from: [f64; 2],
        /// Normalized end position.
        to: [f64; 2],
        /// Seconds to travel from `from` to `to`.
        duration_secs: f64,
    },
}

impl PointerPath {
    /// Fails on non-finite values, a non-positive orbit period or a negative sweep duration.
    pub fn validate(&self) -> BreatheResult<()> {
        let finite = |vals: &[f64]| vals.iter().all(|v| v.is_finite());
        let ok = match *self {
            PointerPath::Center => true,
            PointerPath::Fixed { x, y } => finite(&[x, y]),
            PointerPath::Orbit {
                radius,
                period_secs,
            } => finite(&[radius, period_secs]) && period_secs > 0.0,
            PointerPath::Sweep {
                from,
                to,
                duration_secs,
            } => finite(&[from[0], from[1], to[0], to[1], duration_secs]) && duration_secs >= 0.0,
        };
        if ok {
            Ok(())
        } else {
            Err(BreatheError::config(format!(
                "invalid pointer path {self:?}: values must be finite and durations positive"
            )))
        }
    }

    /// Normalized position at timeline time `secs`, before clamping.
    pub fn normalized_at(&self, secs: f64) -> [f64; 2] {
        match *self {
            PointerPath::Center => [0.5, 0.5],
            PointerPath::Fixed { x, y } => [x, y],
            PointerPath::Orbit {
                radius,
                period_secs,
            } => {
                let angle = TAU * secs / period_secs;
                [0.5 + radius * angle.cos(), 0.5 + radius * angle.sin()]
            }
            PointerPath::Sweep {
                from,
                to,
                duration_secs,
            } => {
                let t = if duration_secs > 0.0 {
                    (secs / duration_secs).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                [lerp(from[0], to[0], t), lerp(from[1], to[1], t)]
            }
        }
    }

    /// Pointer position in surface coordinates at timeline time `secs`.
    pub fn position_at(&self, secs: f64, canvas: Canvas) -> Point {
        let [nx, ny] = self.normalized_at(secs);
        canvas.clamp_point(canvas.denormalize(nx, ny))
    }
}
