use crate::animation::color::Smoothing;
use crate::audio::sink::GAIN_RAMP_MS;
use crate::foundation::color::Hsba;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{BreatheError, BreatheResult};
use crate::input::pointer::PointerPath;
use crate::shape::blob::BlobConfig;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// What a resize does to canvas-derived blob radii.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizePolicy {
    /// Keep the base radius computed at construction.
    #[default]
    FreezeBaseRadius,
    /// Recompute width-relative radii from the new canvas width.
    RecomputeBaseRadius,
}

/// Audio collaborator settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Arm the audio collaborator as if the user enabled it before the first frame.
    pub enabled: bool,
    /// Start muted; gain requests are still issued.
    pub muted: bool,
    /// Ramp time of each gain request.
    pub ramp_ms: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            muted: false,
            ramp_ms: GAIN_RAMP_MS,
        }
    }
}

/// Serializable scene description.
///
/// Every field has a default, so `{}` describes the two-blob scene on an 800x600 canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Surface size.
    pub canvas: Canvas,
    /// Timeline frame rate.
    pub fps: Fps,
    /// Length of a full render in frames.
    pub duration_frames: u64,
    /// Clear color of every frame.
    pub background: Hsba,
    /// Blobs in draw order.
    pub blobs: Vec<BlobConfig>,
    /// Scripted pointer for headless renders.
    pub pointer: PointerPath,
    /// Color smoothing mode.
    pub smoothing: Smoothing,
    /// Radius behavior on resize.
    pub resize: ResizePolicy,
    /// Noise seed. Unset picks a random seed per run.
    pub seed: Option<u64>,
    /// Audio collaborator settings.
    pub audio: AudioConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            fps: Fps::default(),
            duration_frames: 480,
            background: Hsba::opaque(220.0, 25.0, 15.0),
            blobs: vec![BlobConfig::for_index(0), BlobConfig::for_index(1)],
            pointer: PointerPath::default(),
            smoothing: Smoothing::default(),
            resize: ResizePolicy::default(),
            seed: None,
            audio: AudioConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Parse a scene from JSON.
    pub fn from_reader<R: std::io::Read>(r: R) -> BreatheResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| BreatheError::serde(format!("parse scene JSON: {e}")))
    }

    /// Parse a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> BreatheResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            BreatheError::config(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Serialize as indented JSON.
    pub fn to_json_pretty(&self) -> BreatheResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BreatheError::serde(format!("serialize scene JSON: {e}")))
    }

    /// Reject degenerate scenes before anything is built from them.
    pub fn validate(&self) -> BreatheResult<()> {
        Canvas::new(self.canvas.width, self.canvas.height)?;
        Fps::new(self.fps.num, self.fps.den)?;
        if self.blobs.is_empty() {
            return Err(BreatheError::config("scene must contain at least one blob"));
        }
        for (i, blob) in self.blobs.iter().enumerate() {
            blob.validate().map_err(|e| match e {
                BreatheError::Config(msg) => BreatheError::config(format!("blobs[{i}]: {msg}")),
                other => other,
            })?;
        }
        self.pointer.validate()?;
        if let Smoothing::TimeNormalized { reference_fps } = self.smoothing
            && (!reference_fps.is_finite() || reference_fps <= 0.0)
        {
            return Err(BreatheError::config(
                "time-normalized smoothing needs a finite reference_fps > 0",
            ));
        }
        let bg = self.background;
        if ![bg.h, bg.s, bg.b, bg.a].iter().all(|v| v.is_finite()) {
            return Err(BreatheError::config("background color must be finite"));
        }
        if !self.audio.ramp_ms.is_finite() || self.audio.ramp_ms < 0.0 {
            return Err(BreatheError::config("audio ramp_ms must be finite and >= 0"));
        }
        Ok(())
    }

    /// Seed to use for the noise field, drawing a fresh one when unset.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| fastrand::u64(..))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
