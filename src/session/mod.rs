//! Session-oriented rendering API.

/// Frame and range rendering over a scene.
pub mod render_session;
