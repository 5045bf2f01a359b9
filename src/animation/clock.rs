/// Frame rate assumed when the host does not report one.
pub const DEFAULT_FRAME_RATE: f64 = 60.0;

/// One tick of the animation clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    /// Frame counter; the first tick is frame 1.
    pub frame: u64,
    /// Seconds this frame advances the animation by.
    pub dt: f64,
}

/// Frame counter plus the host-reported frame rate.
///
/// `dt` is derived as `1 / reported_fps`, so a slow host slows the breathing down instead of
/// skipping through it.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameClock {
    frame: u64,
    reported_fps: Option<f64>,
}

impl FrameClock {
    /// Clock at frame 0 with an optional host-reported rate.
    pub fn new(reported_fps: Option<f64>) -> Self {
        let mut clock = Self::default();
        clock.set_reported_fps(reported_fps);
        clock
    }

    /// Update the host-reported rate. Non-finite or non-positive values count as unreported.
    pub fn set_reported_fps(&mut self, fps: Option<f64>) {
        self.reported_fps = fps.filter(|f| f.is_finite() && *f > 0.0);
    }

    /// Reported rate, or [`DEFAULT_FRAME_RATE`] when none is known.
    pub fn frame_rate(&self) -> f64 {
        self.reported_fps.unwrap_or(DEFAULT_FRAME_RATE)
    }

    /// Frames ticked so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advance one frame.
    pub fn tick(&mut self) -> FrameTick {
        self.frame += 1;
        FrameTick {
            frame: self.frame,
            dt: 1.0 / self.frame_rate(),
        }
    }
}
