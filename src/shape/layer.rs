//! One concentric contour ring of a blob.
//!
//! A [`Layer`] is immutable after construction. Every frame it turns the shared breath, color
//! and frame counter into a closed polygon in blob-local coordinates:
//!
//! 1. radius envelope: base radius + breath swing + depth spacing, with a small outward
//!    correction for every layer below `layer_count - 1`
//! 2. alpha shimmer, phase-offset by index
//! 3. hue banded by index
//! 4. a vertex ring deformed by a rotating ripple plus two octaves-apart noise samples, damped
//!    toward higher indices

use crate::animation::noise::NoiseSource;
use crate::foundation::color::Hsba;
use crate::foundation::core::Point;
use crate::foundation::error::{BreatheError, BreatheResult};
use crate::foundation::math::{lerp, map_range, ring_angle};

/// Layers per blob when unset.
pub const DEFAULT_LAYER_COUNT: u32 = 60;
/// Vertices per contour when unset.
pub const DEFAULT_POINT_COUNT: u32 = 160;
/// Fewest vertices that still close a polygon.
pub const MIN_POINT_COUNT: u32 = 3;
/// Point counts below this show visible faceting at typical blob sizes.
pub const SMOOTH_POINT_COUNT: u32 = 60;

const SEPARATION_STEP: f64 = 0.5;
const SEPARATION_BLEND: f64 = 0.08;
const SHIMMER_SPEED: f64 = 0.005;
const SHIMMER_SPREAD: f64 = 0.3;
const HUE_STEP: f64 = 3.0;
const RIPPLE_FREQUENCY: f64 = 0.2;
const RIPPLE_SPEED: f64 = 0.002;
const COARSE_SCALE: f64 = 0.5;
const COARSE_DRIFT: f64 = 0.001;
const COARSE_LAYER_STEP: f64 = 0.05;
const FINE_SCALE: f64 = 1.5;
const FINE_DRIFT: f64 = 0.002;
const FINE_LAYER_STEP: f64 = 0.1;
const DAMPING_INNER: f64 = 1.0;
const DAMPING_OUTER: f64 = 0.6;

/// Tunable amplitudes of the contour algorithm.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShapeParams {
    /// Radius swing at breath 0 and 1 (`-swing..swing`).
    pub breath_swing: f64,
    /// Extra radius per layer index.
    pub layer_spacing: f64,
    /// Amplitude of the rotating sine ripple.
    pub ripple_amplitude: f64,
    /// Amplitude of the low-frequency noise wobble.
    pub coarse_amplitude: f64,
    /// Amplitude of the high-frequency noise detail.
    pub fine_amplitude: f64,
    /// Alpha (0..100) of the layer at `index == layer_count`.
    pub alpha_max: f64,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            breath_swing: 15.0,
            layer_spacing: 2.0,
            ripple_amplitude: 10.0,
            coarse_amplitude: 5.0,
            fine_amplitude: 2.0,
            alpha_max: 12.0,
        }
    }
}

/// Blob-wide parameters every layer of one blob shares.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerStyle {
    /// Vertices per contour.
    pub point_count: u32,
    /// Hue offset added to every layer.
    pub hue_shift: f64,
    /// Phase offset of the sine ripple.
    pub ripple_phase: f64,
    /// Blob-level seeds added to the per-layer noise offsets.
    pub noise_seeds: [f64; 2],
    /// Contour amplitudes.
    pub shape: ShapeParams,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            point_count: DEFAULT_POINT_COUNT,
            hue_shift: 0.0,
            ripple_phase: 0.0,
            noise_seeds: [0.0, 0.0],
            shape: ShapeParams::default(),
        }
    }
}

/// Shared per-frame inputs for drawing a layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerFrame {
    /// Animation frame counter (starts at 1 on the first rendered frame).
    pub frame: u64,
    /// Breathing signal in `[-0.4, 1.0]`.
    pub breath: f64,
    /// Blob hue in degrees, before per-layer banding.
    pub hue: f64,
    /// Blob saturation, 0..100.
    pub sat: f64,
}

/// A generated closed polygon and its fill.
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    /// Closed polygon, last vertex joins the first.
    pub vertices: Vec<Point>,
    /// Fill color.
    pub fill: Hsba,
}

/// One contour ring of a blob. Immutable apart from its base radius.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    index: u32,
    layer_count: u32,
    base_radius: f64,
    alpha_base: f64,
    noise_offset_a: f64,
    noise_offset_b: f64,
    style: LayerStyle,
}

impl Layer {
    /// Build layer `index` (in `1..=layer_count`) of a blob.
    pub fn new(
        index: u32,
        layer_count: u32,
        base_radius: f64,
        style: LayerStyle,
    ) -> BreatheResult<Self> {
        if layer_count == 0 {
            return Err(BreatheError::config("layer count must be >= 1"));
        }
        if index == 0 || index > layer_count {
            return Err(BreatheError::config(format!(
                "layer index {index} outside 1..={layer_count}"
            )));
        }
        if style.point_count < MIN_POINT_COUNT {
            return Err(BreatheError::config(format!(
                "point count must be >= {MIN_POINT_COUNT} (got {})",
                style.point_count
            )));
        }
        if !base_radius.is_finite() {
            return Err(BreatheError::config("base radius must be finite"));
        }

        let i = f64::from(index);
        Ok(Self {
            index,
            layer_count,
            base_radius,
            alpha_base: alpha_base(index, layer_count, style.shape.alpha_max),
            noise_offset_a: i * COARSE_LAYER_STEP + style.noise_seeds[0],
            noise_offset_b: i * FINE_LAYER_STEP + style.noise_seeds[1],
            style,
        })
    }

    /// Index in `1..=layer_count`; higher is further out.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Layers in the owning blob.
    pub fn layer_count(&self) -> u32 {
        self.layer_count
    }

    /// Base radius shared with the owning blob.
    pub fn base_radius(&self) -> f64 {
        self.base_radius
    }

    /// Alpha before shimmer, 0..100.
    pub fn alpha_base(&self) -> f64 {
        self.alpha_base
    }

    /// Vertices per contour.
    pub fn point_count(&self) -> usize {
        self.style.point_count as usize
    }

    pub(crate) fn set_base_radius(&mut self, base_radius: f64) {
        self.base_radius = base_radius;
    }

    /// Radius envelope for the given breath value.
    pub fn radius(&self, breath: f64) -> f64 {
        let shape = &self.style.shape;
        let i = f64::from(self.index);
        let count = f64::from(self.layer_count);
        let r = self.base_radius
            + map_range(breath, 0.0, 1.0, -shape.breath_swing, shape.breath_swing)
            + i * shape.layer_spacing;
        if self.index + 1 < self.layer_count {
            lerp(r, r + (count - i) * SEPARATION_STEP, SEPARATION_BLEND)
        } else {
            r
        }
    }

    /// Radius at neutral breath (0.5), where the breath swing contributes nothing.
    pub fn rest_radius(&self) -> f64 {
        self.radius(0.5)
    }

    /// Shimmering alpha (0..100) at `frame`.
    pub fn alpha(&self, frame: u64) -> f64 {
        let phase = frame as f64 * SHIMMER_SPEED + f64::from(self.index) * SHIMMER_SPREAD;
        self.alpha_base * (0.8 + 0.2 * phase.sin())
    }

    /// Fill color for this layer.
    pub fn fill(&self, frame: &LayerFrame) -> Hsba {
        let hue = (frame.hue + f64::from(self.index) * HUE_STEP + self.style.hue_shift)
            .rem_euclid(360.0);
        Hsba::new(hue, frame.sat, 100.0, self.alpha(frame.frame))
    }

    /// Deformation multiplier: 1.0 at index 0 falling linearly to 0.6 at `layer_count`.
    pub fn deformation_scale(&self) -> f64 {
        map_range(
            f64::from(self.index),
            0.0,
            f64::from(self.layer_count),
            DAMPING_INNER,
            DAMPING_OUTER,
        )
    }

    /// Write this frame's vertex ring into `out`, replacing its contents.
    pub fn contour_into<N: NoiseSource + ?Sized>(
        &self,
        noise: &N,
        frame: &LayerFrame,
        out: &mut Vec<Point>,
    ) {
        let shape = &self.style.shape;
        let count = self.point_count();
        let f = frame.frame as f64;
        let radius = self.radius(frame.breath);
        let damping = self.deformation_scale();
        let offset_a = self.noise_offset_a + f * COARSE_DRIFT;
        let offset_b = self.noise_offset_b + f * FINE_DRIFT;

        out.clear();
        out.reserve(count);
        for j in 0..count {
            let (sin, cos) = ring_angle(j, count).sin_cos();
            let ripple = shape.ripple_amplitude
                * (j as f64 * RIPPLE_FREQUENCY + f * RIPPLE_SPEED + self.style.ripple_phase).sin();
            let coarse = map_range(
                noise.sample(cos * COARSE_SCALE + offset_a, sin * COARSE_SCALE + offset_a),
                0.0,
                1.0,
                -shape.coarse_amplitude,
                shape.coarse_amplitude,
            );
            let fine = map_range(
                noise.sample(cos * FINE_SCALE + offset_b, sin * FINE_SCALE + offset_b),
                0.0,
                1.0,
                -shape.fine_amplitude,
                shape.fine_amplitude,
            );
            let r = radius + (ripple + coarse + fine) * damping;
            out.push(Point::new(cos * r, sin * r));
        }
    }

    /// Generate this frame's contour.
    pub fn contour<N: NoiseSource + ?Sized>(&self, noise: &N, frame: &LayerFrame) -> Contour {
        let mut vertices = Vec::with_capacity(self.point_count());
        self.contour_into(noise, frame, &mut vertices);
        Contour {
            vertices,
            fill: self.fill(frame),
        }
    }
}

/// Linear depth-to-alpha map: 0 at index 0, `alpha_max` at `layer_count`.
pub fn alpha_base(index: u32, layer_count: u32, alpha_max: f64) -> f64 {
    map_range(
        f64::from(index),
        0.0,
        f64::from(layer_count),
        0.0,
        alpha_max,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/shape/layer.rs"]
mod tests;
