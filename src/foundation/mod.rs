//! Core value types shared by every other module.

/// Color model used by the drawing commands.
pub mod color;
/// Canvas, frame rate and frame index types.
pub mod core;
/// Crate-wide error type.
pub mod error;
/// Small numeric helpers.
pub mod math;
