//! Breath-following audio.

/// Gain automation recorded from scene requests.
pub mod automation;
/// Offline drone synthesis.
pub mod drone;
/// Audio collaborator contract.
pub mod sink;
