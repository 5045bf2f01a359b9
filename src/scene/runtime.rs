use crate::animation::clock::FrameClock;
use crate::animation::color::Smoothing;
use crate::animation::noise::{NoiseField, NoiseSource};
use crate::audio::sink::{AudioSink, gain_target};
use crate::foundation::color::Hsba;
use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::BreatheResult;
use crate::render::surface::RenderSurface;
use crate::scene::model::{AudioConfig, ResizePolicy, SceneConfig};
use crate::shape::blob::Blob;

/// Summary of one rendered frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    /// Frame counter after the tick; the first frame is 1.
    pub frame: u64,
    /// Seconds the frame advanced the animation by.
    pub dt: f64,
    /// Breath value of the last blob drawn.
    pub breath: f64,
    /// Gain requested from the audio sink, when one is attached.
    pub gain: Option<f64>,
    /// Polygons issued to the surface.
    pub polygons: usize,
}

/// Audio sink plus the two user-facing switches.
struct AudioLink {
    sink: Box<dyn AudioSink>,
    armed: bool,
    muted: bool,
    ramp_ms: f64,
}

impl AudioLink {
    fn follow(&mut self, breath: f64) -> f64 {
        let target = if self.armed && !self.muted {
            gain_target(breath)
        } else {
            0.0
        };
        self.sink.set_gain_target(target, self.ramp_ms);
        target
    }
}

impl std::fmt::Debug for AudioLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioLink")
            .field("armed", &self.armed)
            .field("muted", &self.muted)
            .field("ramp_ms", &self.ramp_ms)
            .finish_non_exhaustive()
    }
}

/// Blobs sharing one clock, one noise field and one background.
///
/// Each frame clears the surface, then updates and draws every blob in order. The breath of the
/// last blob drives the optional audio sink.
#[derive(Debug)]
pub struct Scene<N = NoiseField> {
    blobs: Vec<Blob>,
    noise: N,
    clock: FrameClock,
    canvas: Canvas,
    background: Hsba,
    smoothing: Smoothing,
    resize_policy: ResizePolicy,
    audio_cfg: AudioConfig,
    audio: Option<AudioLink>,
    last_breath: f64,
}

impl Scene<NoiseField> {
    /// Build a scene seeded from `cfg.seed`, or randomly when unset.
    pub fn new(cfg: &SceneConfig) -> BreatheResult<Self> {
        let seed = cfg.resolve_seed();
        tracing::debug!(seed, "scene noise seed");
        Self::with_noise(cfg, NoiseField::new(seed))
    }
}

impl<N: NoiseSource> Scene<N> {
    /// Validate `cfg` and build the scene over an explicit noise source.
    pub fn with_noise(cfg: &SceneConfig, noise: N) -> BreatheResult<Self> {
        cfg.validate()?;
        let canvas = cfg.canvas;
        let blobs = cfg
            .blobs
            .iter()
            .map(|b| Blob::new(b, canvas))
            .collect::<BreatheResult<Vec<_>>>()?;
        let last_breath = blobs.last().map(|b| b.breath().value()).unwrap_or(0.0);

        Ok(Self {
            blobs,
            noise,
            clock: FrameClock::new(Some(cfg.fps.as_f64())),
            canvas,
            background: cfg.background,
            smoothing: cfg.smoothing,
            resize_policy: cfg.resize,
            audio_cfg: cfg.audio,
            audio: None,
            last_breath,
        })
    }

    /// Render one frame onto `surface`.
    ///
    /// `pointer` is in surface coordinates; `None` means it was never set and resolves to the
    /// canvas center. A surface whose size differs from the scene's is treated as a resize.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn render_frame<S>(&mut self, surface: &mut S, pointer: Option<Point>) -> FrameReport
    where
        S: RenderSurface + ?Sized,
    {
        let canvas = surface.size();
        self.resize(canvas);
        let pointer = canvas.clamp_point(pointer.unwrap_or_else(|| canvas.center()));

        let tick = self.clock.tick();
        surface.clear(self.background);
        let mut polygons = 0;
        for blob in &mut self.blobs {
            self.last_breath = blob.update(&tick, pointer, surface, &self.noise, self.smoothing);
            polygons += blob.layers().len();
        }
        let gain = self.audio.as_mut().map(|link| link.follow(self.last_breath));

        FrameReport {
            frame: tick.frame,
            dt: tick.dt,
            breath: self.last_breath,
            gain,
            polygons,
        }
    }
}

impl<N> Scene<N> {
    /// Apply a canvas size change. Calling it with the current size does nothing; animation
    /// state always survives.
    pub fn resize(&mut self, canvas: Canvas) {
        if canvas == self.canvas {
            return;
        }
        tracing::debug!(
            from_w = self.canvas.width,
            from_h = self.canvas.height,
            to_w = canvas.width,
            to_h = canvas.height,
            policy = ?self.resize_policy,
            "scene resized"
        );
        self.canvas = canvas;
        if self.resize_policy == ResizePolicy::RecomputeBaseRadius {
            for blob in &mut self.blobs {
                blob.rescale(canvas);
            }
        }
    }

    /// Attach an audio sink. It stays silent until [`Scene::enable_audio`] succeeds.
    pub fn attach_audio(&mut self, sink: Box<dyn AudioSink>) {
        self.shutdown();
        self.audio = Some(AudioLink {
            sink,
            armed: false,
            muted: self.audio_cfg.muted,
            ramp_ms: self.audio_cfg.ramp_ms,
        });
    }

    /// User action that starts the audio sink. Returns whether audio is armed afterwards.
    ///
    /// A failing start is logged and leaves the mute state untouched; rendering continues either
    /// way.
    pub fn enable_audio(&mut self) -> bool {
        let Some(link) = self.audio.as_mut() else {
            tracing::debug!("enable_audio called without an attached sink");
            return false;
        };
        if link.armed {
            return true;
        }
        match link.sink.start() {
            Ok(()) => {
                link.armed = true;
                tracing::debug!(muted = link.muted, "audio armed");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "audio failed to start; continuing silently");
                false
            }
        }
    }

    /// Mute or unmute. A muted scene keeps issuing gain requests, all with target 0.
    pub fn set_muted(&mut self, muted: bool) {
        self.audio_cfg.muted = muted;
        if let Some(link) = self.audio.as_mut() {
            link.muted = muted;
        }
    }

    /// Current mute flag.
    pub fn is_muted(&self) -> bool {
        self.audio_cfg.muted
    }

    /// True once the audio sink has started.
    pub fn is_audio_armed(&self) -> bool {
        self.audio.as_ref().is_some_and(|l| l.armed)
    }

    /// Stop the audio sink if it is running. Dropping the scene does the same.
    pub fn shutdown(&mut self) {
        if let Some(link) = self.audio.as_mut()
            && link.armed
        {
            link.sink.stop();
            link.armed = false;
            tracing::debug!("audio stopped");
        }
    }

    /// Override the frame rate used to derive `dt`. `None` falls back to 60.
    pub fn set_reported_fps(&mut self, fps: Option<f64>) {
        self.clock.set_reported_fps(fps);
    }

    /// Blobs in draw order.
    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    /// Current canvas size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Frames rendered so far.
    pub fn frame(&self) -> u64 {
        self.clock.frame()
    }

    /// Frame rate used to derive `dt`.
    pub fn frame_rate(&self) -> f64 {
        self.clock.frame_rate()
    }

    /// Breath value reported by the most recent frame.
    pub fn last_breath(&self) -> f64 {
        self.last_breath
    }
}

impl<N> Drop for Scene<N> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/runtime.rs"]
mod tests;
