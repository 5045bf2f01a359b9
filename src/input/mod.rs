//! Pointer input for offline renders.

/// Scripted pointer paths.
pub mod pointer;
