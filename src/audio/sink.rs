use crate::foundation::error::BreatheResult;

/// Ramp time used for every gain request issued by the scene.
pub const GAIN_RAMP_MS: f64 = 150.0;

/// Gain floor reached at the bottom of the breath in the audible band.
pub const GAIN_FLOOR: f64 = 0.3;

/// Map a breath value to the gain target requested from the audio sink.
///
/// The breathing signal dips below zero, so the result is clamped into `[0, 1]`.
pub fn gain_target(breath: f64) -> f64 {
    (GAIN_FLOOR + breath * (1.0 - GAIN_FLOOR)).clamp(0.0, 1.0)
}

/// Audio collaborator driven by the breathing signal.
///
/// Gain requests are fire-and-forget: the scene issues one "ramp to `value` over `ramp_ms`"
/// request per frame and never waits on it. `start` must only be called after an explicit
/// user action.
pub trait AudioSink: Send {
    /// Begin producing sound. Failures leave the caller's mute state unchanged.
    fn start(&mut self) -> BreatheResult<()>;

    /// Stop producing sound and release any resources.
    fn stop(&mut self);

    /// Request a linear ramp from the current gain to `value` (in `[0, 1]`) over `ramp_ms`.
    fn set_gain_target(&mut self, value: f64, ramp_ms: f64);
}
