use crate::animation::breath::{BreathOscillator, DEFAULT_BREATH_SPEED};
use crate::animation::clock::FrameTick;
use crate::animation::color::{ColorDrifter, DEFAULT_HUE, DEFAULT_SAT, DRIFT_RATE, Smoothing};
use crate::animation::noise::NoiseSource;
use crate::foundation::core::{Canvas, Point, Vec2};
use crate::foundation::error::{BreatheError, BreatheResult};
use crate::foundation::math::map_range;
use crate::render::surface::RenderSurface;
use crate::shape::layer::{
    DEFAULT_LAYER_COUNT, DEFAULT_POINT_COUNT, Layer, LayerFrame, LayerStyle, MIN_POINT_COUNT,
    SMOOTH_POINT_COUNT, ShapeParams,
};

const JITTER_AMPLITUDE: f64 = 5.0;
const JITTER_SPEED: f64 = 0.002;
const JITTER_DECORRELATE: f64 = 100.0;

/// How a blob's base radius is specified.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlobRadius {
    /// Fraction of the canvas width.
    WidthFraction(f64),
    /// Absolute radius in pixels; never affected by resizes.
    Pixels(f64),
}

impl BlobRadius {
    /// Radius in pixels on `canvas`.
    pub fn resolve(self, canvas: Canvas) -> f64 {
        match self {
            BlobRadius::WidthFraction(f) => f * f64::from(canvas.width),
            BlobRadius::Pixels(px) => px,
        }
    }
}

/// Serializable description of one blob.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BlobConfig {
    /// Number of concentric layers.
    pub layers: u32,
    /// Vertices per layer contour.
    pub points: u32,
    /// Base radius of the innermost layer at rest.
    pub radius: BlobRadius,
    /// Blob center in normalized canvas coordinates.
    pub center: [f64; 2],
    /// Breathing speed in cycles per second.
    pub breath_speed: f64,
    /// Initial breathing phase in `[0, 1)`.
    pub breath_phase: f64,
    /// Initial hue of the color drifter.
    pub hue: f64,
    /// Initial saturation of the color drifter.
    pub sat: f64,
    /// Constant hue offset added to every layer of this blob.
    pub hue_shift: f64,
    /// Phase offset of the sine ripple.
    pub ripple_phase: f64,
    /// Blob-level noise seeds for the coarse and fine samples.
    pub noise_seeds: [f64; 2],
    /// Contour amplitudes.
    pub shape: ShapeParams,
}

impl BlobConfig {
    /// Defaults for the `index`-th blob of a scene: each successive blob is a little larger,
    /// hue-shifted, and samples a different region of the noise field.
    pub fn for_index(index: u32) -> Self {
        let b = f64::from(index);
        Self {
            radius: BlobRadius::WidthFraction(0.12 + b * 0.03),
            hue_shift: b * 25.0,
            ripple_phase: b * 2.0,
            noise_seeds: [b * 5.0, b * 2.0],
            ..Self::default()
        }
    }

    /// Reject degenerate or non-finite parameters and a saturation outside `[0, 100]`.
    pub fn validate(&self) -> BreatheResult<()> {
        if self.layers == 0 {
            return Err(BreatheError::config("blob layers must be >= 1"));
        }
        if self.points < MIN_POINT_COUNT {
            return Err(BreatheError::config(format!(
                "blob points must be >= {MIN_POINT_COUNT} (got {})",
                self.points
            )));
        }
        let radius = match self.radius {
            BlobRadius::WidthFraction(f) | BlobRadius::Pixels(f) => f,
        };
        if !radius.is_finite() || radius <= 0.0 {
            return Err(BreatheError::config(format!(
                "blob radius must be finite and > 0 (got {radius})"
            )));
        }
        let finite = [
            self.center[0],
            self.center[1],
            self.breath_speed,
            self.breath_phase,
            self.hue,
            self.sat,
            self.hue_shift,
            self.ripple_phase,
            self.noise_seeds[0],
            self.noise_seeds[1],
            self.shape.breath_swing,
            self.shape.layer_spacing,
            self.shape.ripple_amplitude,
            self.shape.coarse_amplitude,
            self.shape.fine_amplitude,
            self.shape.alpha_max,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(BreatheError::config("blob parameters must be finite"));
        }
        if !(0.0..=100.0).contains(&self.sat) {
            return Err(BreatheError::config(format!(
                "blob sat must be in [0, 100] (got {})",
                self.sat
            )));
        }
        Ok(())
    }

    fn style(&self) -> LayerStyle {
        LayerStyle {
            point_count: self.points,
            hue_shift: self.hue_shift,
            ripple_phase: self.ripple_phase,
            noise_seeds: self.noise_seeds,
            shape: self.shape,
        }
    }
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            layers: DEFAULT_LAYER_COUNT,
            points: DEFAULT_POINT_COUNT,
            radius: BlobRadius::WidthFraction(0.12),
            center: [0.5, 0.5],
            breath_speed: DEFAULT_BREATH_SPEED,
            breath_phase: 0.0,
            hue: DEFAULT_HUE,
            sat: DEFAULT_SAT,
            hue_shift: 0.0,
            ripple_phase: 0.0,
            noise_seeds: [0.0, 0.0],
            shape: ShapeParams::default(),
        }
    }
}

/// Static per-layer values of a blob at rest.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerRow {
    /// Layer index, `1..=layers`.
    pub index: u32,
    /// Radius at breath 0.5.
    pub rest_radius: f64,
    /// Alpha before shimmer, 0..100.
    pub alpha_base: f64,
}

/// One breathing organism: concentric layers sharing an oscillator and a color drifter.
#[derive(Clone, Debug)]
pub struct Blob {
    /// Always ordered by descending index: outermost first, so inner layers land on top.
    layers: Vec<Layer>,
    breath: BreathOscillator,
    drifter: ColorDrifter,
    radius: BlobRadius,
    base_radius: f64,
    center: [f64; 2],
    jitter: Vec2,
    scratch: Vec<Point>,
}

impl Blob {
    /// Validate `cfg` and build its layers for `canvas`.
    pub fn new(cfg: &BlobConfig, canvas: Canvas) -> BreatheResult<Self> {
        cfg.validate()?;
        if cfg.points < SMOOTH_POINT_COUNT {
            tracing::warn!(
                points = cfg.points,
                "blob point count below {SMOOTH_POINT_COUNT}; contours will look faceted"
            );
        }

        let base_radius = cfg.radius.resolve(canvas);
        let style = cfg.style();
        let layers = (1..=cfg.layers)
            .rev()
            .map(|i| Layer::new(i, cfg.layers, base_radius, style))
            .collect::<BreatheResult<Vec<_>>>()?;

        Ok(Self {
            layers,
            breath: BreathOscillator::new(cfg.breath_speed, cfg.breath_phase)?,
            drifter: ColorDrifter::new(cfg.hue, cfg.sat),
            radius: cfg.radius,
            base_radius,
            center: cfg.center,
            jitter: Vec2::ZERO,
            scratch: Vec::with_capacity(cfg.points as usize),
        })
    }

    /// Layers in draw order (descending index).
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Breathing oscillator.
    pub fn breath(&self) -> &BreathOscillator {
        &self.breath
    }

    /// Color drift state.
    pub fn drifter(&self) -> &ColorDrifter {
        &self.drifter
    }

    /// Resolved base radius in pixels.
    pub fn base_radius(&self) -> f64 {
        self.base_radius
    }

    /// Current center displacement.
    pub fn jitter(&self) -> Vec2 {
        self.jitter
    }

    /// Drawing origin on `canvas`: the configured center displaced by the current jitter.
    pub fn origin(&self, canvas: Canvas) -> Point {
        canvas.denormalize(self.center[0], self.center[1]) + self.jitter
    }

    /// Rest radius and base alpha of every layer, in draw order.
    pub fn layer_table(&self) -> Vec<LayerRow> {
        self.layers
            .iter()
            .map(|l| LayerRow {
                index: l.index(),
                rest_radius: l.rest_radius(),
                alpha_base: l.alpha_base(),
            })
            .collect()
    }

    /// Recompute the canvas-derived base radius, keeping oscillator and color state.
    pub(crate) fn rescale(&mut self, canvas: Canvas) {
        let base_radius = self.radius.resolve(canvas);
        if base_radius == self.base_radius {
            return;
        }
        self.base_radius = base_radius;
        for layer in &mut self.layers {
            layer.set_base_radius(base_radius);
        }
    }

    /// Advance oscillator, color drift and jitter for one tick. Returns the breath value.
    pub fn advance<N: NoiseSource + ?Sized>(
        &mut self,
        tick: &FrameTick,
        pointer: Point,
        canvas: Canvas,
        noise: &N,
        smoothing: Smoothing,
    ) -> f64 {
        self.breath.advance(tick.dt);
        self.drifter
            .advance_with(pointer, canvas, smoothing.blend(DRIFT_RATE, tick.dt));

        let t = tick.frame as f64 * JITTER_SPEED;
        self.jitter = Vec2::new(
            map_range(
                noise.sample1d(t),
                0.0,
                1.0,
                -JITTER_AMPLITUDE,
                JITTER_AMPLITUDE,
            ),
            map_range(
                noise.sample1d(t + JITTER_DECORRELATE),
                0.0,
                1.0,
                -JITTER_AMPLITUDE,
                JITTER_AMPLITUDE,
            ),
        );
        self.breath.value()
    }

    /// Draw every layer back to front around the jittered origin.
    pub fn draw<S, N>(&mut self, frame: u64, surface: &mut S, noise: &N)
    where
        S: RenderSurface + ?Sized,
        N: NoiseSource + ?Sized,
    {
        let origin = self.origin(surface.size()).to_vec2();
        let params = LayerFrame {
            frame,
            breath: self.breath.value(),
            hue: self.drifter.hue(),
            sat: self.drifter.sat(),
        };
        for layer in &self.layers {
            layer.contour_into(noise, &params, &mut self.scratch);
            for p in &mut self.scratch {
                *p += origin;
            }
            surface.fill_polygon(&self.scratch, layer.fill(&params));
        }
    }

    /// Advance and draw one frame. Returns the breath value.
    pub fn update<S, N>(
        &mut self,
        tick: &FrameTick,
        pointer: Point,
        surface: &mut S,
        noise: &N,
        smoothing: Smoothing,
    ) -> f64
    where
        S: RenderSurface + ?Sized,
        N: NoiseSource + ?Sized,
    {
        let canvas = surface.size();
        let breath = self.advance(tick, pointer, canvas, noise, smoothing);
        self.draw(tick.frame, surface, noise);
        breath
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shape/blob.rs"]
mod tests;
