//! Layered blob geometry.

/// Blob: a stack of layers sharing one breath and one color drifter.
pub mod blob;
/// Single noise-deformed contour.
pub mod layer;
