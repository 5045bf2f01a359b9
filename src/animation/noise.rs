//! Coherent 2D noise.
//!
//! [`NoiseField`] is 4-octave fractal Perlin noise from the `noise` crate, remapped from its
//! signed output into `[0, 1)`. It is continuous in both inputs and fixed for a given seed.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

const OCTAVES: usize = 4;
const PERSISTENCE: f64 = 0.5;

/// Anything that can be sampled as smooth 2D noise in `[0, 1)`.
pub trait NoiseSource {
    /// Sample the field at `(x, y)`.
    fn sample(&self, x: f64, y: f64) -> f64;

    /// One-dimensional convenience used for time-indexed jitter.
    fn sample1d(&self, t: f64) -> f64 {
        self.sample(t, 0.0)
    }
}

/// Seeded coherent noise field.
#[derive(Clone, Debug)]
pub struct NoiseField {
    seed: u64,
    fbm: Fbm<Perlin>,
}

impl NoiseField {
    /// Build the field for `seed`. Both halves of the seed feed the Perlin permutation seed.
    pub fn new(seed: u64) -> Self {
        let folded = (seed ^ (seed >> 32)) as u32;
        let fbm = Fbm::<Perlin>::new(folded)
            .set_octaves(OCTAVES)
            .set_persistence(PERSISTENCE);
        Self { seed, fbm }
    }

    /// Seed the field was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl NoiseSource for NoiseField {
    /// Negative coordinates are mirrored; non-finite ones sample as 0.
    fn sample(&self, x: f64, y: f64) -> f64 {
        let (x, y) = (x.abs(), y.abs());
        if !x.is_finite() || !y.is_finite() {
            return 0.0;
        }
        let v = self.fbm.get([x, y]);
        (v * 0.5 + 0.5).clamp(0.0, 1.0 - f64::EPSILON)
    }
}

/// Noise source that always returns the same value. Useful to switch deformation off.
#[derive(Clone, Copy, Debug)]
pub struct ConstantNoise(pub f64);

impl NoiseSource for ConstantNoise {
    fn sample(&self, _x: f64, _y: f64) -> f64 {
        self.0
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for &N {
    fn sample(&self, x: f64, y: f64) -> f64 {
        (**self).sample(x, y)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/noise.rs"]
mod tests;
