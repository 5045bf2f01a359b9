use crate::foundation::error::{BreatheError, BreatheResult};

pub use kurbo::{Point, Vec2};

/// Zero-based frame number on a scene timeline.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Half-open span of frames `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// First frame (inclusive).
    pub start: FrameIndex,
    /// One past the last frame.
    pub end: FrameIndex,
}

impl FrameRange {
    /// Fails if `start > end`. Empty ranges are allowed.
    pub fn new(start: FrameIndex, end: FrameIndex) -> BreatheResult<Self> {
        if start.0 > end.0 {
            return Err(BreatheError::config("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Number of frames covered.
    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// True when the range covers no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// True when `f` lies in `[start, end)`.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }
}

/// Rational frame rate `num / den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator, > 0.
    pub num: u32,
    /// Denominator, > 0.
    pub den: u32,
}

impl Fps {
    /// Fails if either part is zero.
    pub fn new(num: u32, den: u32) -> BreatheResult<Self> {
        if den == 0 {
            return Err(BreatheError::config("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(BreatheError::config("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Length of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Timeline position of frame `frames`, in seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 60, den: 1 }
    }
}

/// Size of the rendering surface in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Fails on a zero dimension.
    pub fn new(width: u32, height: u32) -> BreatheResult<Self> {
        if width == 0 || height == 0 {
            return Err(BreatheError::config("canvas width/height must be non-zero"));
        }
        Ok(Self { width, height })
    }

    /// Middle of the surface.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Clamp `p` into the surface rectangle `[0, width] x [0, height]`.
    pub fn clamp_point(self, p: Point) -> Point {
        Point::new(
            p.x.clamp(0.0, f64::from(self.width)),
            p.y.clamp(0.0, f64::from(self.height)),
        )
    }

    /// Map normalized `[0, 1]` coordinates onto the surface.
    pub fn denormalize(self, nx: f64, ny: f64) -> Point {
        Point::new(nx * f64::from(self.width), ny * f64::from(self.height))
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}
