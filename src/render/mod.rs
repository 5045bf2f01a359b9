//! Drawing surfaces.

/// `vello_cpu` rasterizing surface.
pub mod cpu;
/// Surface trait, frame buffer and test surfaces.
pub mod surface;
