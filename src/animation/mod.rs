//! Time-varying signals: noise, breathing and color drift.

/// Breathing oscillator.
pub mod breath;
/// Frame counter and `dt` derivation.
pub mod clock;
/// Pointer-driven hue and saturation drift.
pub mod color;
/// Seeded coherent noise.
pub mod noise;
