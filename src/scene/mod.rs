//! Scene description and the per-frame driver.
//!
//! [`model::SceneConfig`] is the serializable boundary; [`runtime::Scene`] owns the live state.

/// Serializable scene configuration.
pub mod model;
/// Frame loop over all blobs plus the audio link.
pub mod runtime;
