use crate::audio::automation::{GainAutomation, OfflineAudio};
use crate::audio::drone::{DRONE_CHANNELS, DroneSynth, frame_to_sample, write_f32le_file};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, FrameIndex, FrameRange, Point};
use crate::foundation::error::{BreatheError, BreatheResult};
use crate::render::cpu::CpuSurface;
use crate::render::surface::{FrameRGBA, NullSurface, RenderSurface};
use crate::scene::model::SceneConfig;
use crate::scene::runtime::Scene;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

/// Options controlling `RenderSession` behavior.
#[derive(Clone, Debug)]
pub struct RenderSessionOpts {
    /// Honor `SceneConfig.audio.enabled` and mux a drone track in `render_range`.
    pub enable_audio: bool,
    /// Synth used to turn the recorded gain automation into PCM.
    pub drone: DroneSynth,
}

impl Default for RenderSessionOpts {
    fn default() -> Self {
        Self {
            enable_audio: true,
            drone: DroneSynth::default(),
        }
    }
}

/// Range render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Total frames in the requested range.
    pub frames_total: u64,
    /// Frames rasterized and pushed to the sink.
    pub frames_rendered: u64,
    /// Frames replayed without rasterizing to reach the range start.
    pub frames_replayed: u64,
}

/// Offline renderer for a breathing scene.
///
/// The scene is a forward-only state machine, so frames are produced in timeline order. Asking
/// for a frame out of order replays the animation from frame 0 on a discarding surface, which
/// gives the same pixels as an uninterrupted run because the noise seed is fixed per session.
pub struct RenderSession {
    cfg: SceneConfig,
    opts: RenderSessionOpts,
    scene: Scene,
    surface: CpuSurface,
    automation: Option<Arc<Mutex<GainAutomation>>>,
    replayed: u64,
}

impl RenderSession {
    /// Validate `cfg`, fix its seed and build the live scene and CPU surface.
    pub fn new(cfg: &SceneConfig, opts: RenderSessionOpts) -> BreatheResult<Self> {
        cfg.validate()?;
        let mut cfg = cfg.clone();
        cfg.seed = Some(cfg.resolve_seed());
        let surface = CpuSurface::new(cfg.canvas)?;
        let (scene, automation) = build_scene(&cfg, &opts)?;
        tracing::info!(
            width = cfg.canvas.width,
            height = cfg.canvas.height,
            blobs = cfg.blobs.len(),
            seed = cfg.seed,
            audio = automation.is_some(),
            "render session ready"
        );
        Ok(Self {
            cfg,
            opts,
            scene,
            surface,
            automation,
            replayed: 0,
        })
    }

    /// Scene configuration with the resolved noise seed filled in.
    pub fn config(&self) -> &SceneConfig {
        &self.cfg
    }

    /// Live scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Current output size.
    pub fn canvas(&self) -> Canvas {
        self.surface.size()
    }

    /// Gain automation recorded by the live scene so far, when audio is enabled.
    pub fn gain_automation(&self) -> Option<GainAutomation> {
        self.automation
            .as_ref()
            .map(|a| a.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    /// Resize the output. Animation state is kept; radii follow the scene's resize policy.
    pub fn resize(&mut self, canvas: Canvas) -> BreatheResult<()> {
        self.surface.resize(canvas)?;
        self.scene.resize(canvas);
        Ok(())
    }

    /// Render frame `idx` (0-based) of the timeline.
    pub fn render_frame(&mut self, idx: FrameIndex) -> BreatheResult<FrameRGBA> {
        let timeline = FrameRange::new(FrameIndex(0), FrameIndex(self.cfg.duration_frames))?;
        if !timeline.contains(idx) {
            return Err(BreatheError::config(format!(
                "frame {} is outside the scene duration ({} frames)",
                idx.0, self.cfg.duration_frames
            )));
        }
        self.seek(idx)?;
        let pointer = self.pointer_at(idx);
        let report = self.scene.render_frame(&mut self.surface, Some(pointer));
        tracing::trace!(frame = report.frame, breath = report.breath, "frame rendered");
        Ok(self.surface.finish_frame())
    }

    /// Render a frame range and stream frames into a sink.
    ///
    /// When audio is enabled the gain automation for the range is planned first on a separate
    /// scene, rendered to a temporary `f32le` file and handed to the sink with its config.
    pub fn render_range(
        &mut self,
        range: FrameRange,
        sink: &mut dyn FrameSink,
    ) -> BreatheResult<RenderStats> {
        if range.is_empty() {
            return Err(BreatheError::config("render_range range must be non-empty"));
        }
        if range.end.0 > self.cfg.duration_frames {
            return Err(BreatheError::config(
                "render_range range must be within the scene duration",
            ));
        }
        let started = Instant::now();
        tracing::info!(start = range.start.0, end = range.end.0, "render range started");

        let mut audio_tmp = TempFileGuard(None);
        let audio = if self.automation.is_some() {
            let path = std::env::temp_dir().join(format!(
                "breathe_drone_{}_{}.f32le",
                std::process::id(),
                fastrand::u64(..)
            ));
            self.plan_audio(range, &path)?;
            audio_tmp.0 = Some(path.clone());
            Some(AudioInputConfig {
                path,
                sample_rate: self.opts.drone.sample_rate,
                channels: DRONE_CHANNELS,
            })
        } else {
            None
        };

        let canvas = self.canvas();
        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps: self.cfg.fps,
            audio,
        })?;

        let replayed_before = self.replayed;
        let mut stats = RenderStats {
            frames_total: range.len_frames(),
            ..RenderStats::default()
        };
        for f in range.start.0..range.end.0 {
            let idx = FrameIndex(f);
            let frame = self.render_frame(idx)?;
            sink.push_frame(idx, &frame)?;
            stats.frames_rendered += 1;
        }
        sink.end()?;
        stats.frames_replayed = self.replayed - replayed_before;

        tracing::info!(
            frames = stats.frames_rendered,
            replayed = stats.frames_replayed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "render range finished"
        );
        Ok(stats)
    }

    /// Advance the live scene until its next tick renders frame `idx`.
    fn seek(&mut self, idx: FrameIndex) -> BreatheResult<()> {
        if self.scene.frame() > idx.0 {
            tracing::debug!(
                from = self.scene.frame(),
                to = idx.0,
                "seeking backwards; rebuilding scene"
            );
            let (scene, automation) = build_scene(&self.cfg, &self.opts)?;
            self.scene = scene;
            self.automation = automation;
            self.scene.resize(self.surface.size());
        }
        let mut null = NullSurface::new(self.surface.size());
        while self.scene.frame() < idx.0 {
            let pointer = self.pointer_at(FrameIndex(self.scene.frame()));
            self.scene.render_frame(&mut null, Some(pointer));
            self.replayed += 1;
        }
        Ok(())
    }

    fn pointer_at(&self, idx: FrameIndex) -> Point {
        let secs = self.cfg.fps.frames_to_secs(idx.0);
        self.cfg.pointer.position_at(secs, self.surface.size())
    }

    /// Drive a throwaway scene over `[0, range.end)` and write the drone for `range` to `path`.
    fn plan_audio(&self, range: FrameRange, path: &Path) -> BreatheResult<()> {
        let (mut scene, automation) = build_scene(&self.cfg, &self.opts)?;
        let automation = automation
            .ok_or_else(|| BreatheError::audio("audio planning scene has no audio sink"))?;
        let canvas = self.surface.size();
        scene.resize(canvas);
        let mut null = NullSurface::new(canvas);
        for f in 0..range.end.0 {
            let secs = self.cfg.fps.frames_to_secs(f);
            let pointer = self.cfg.pointer.position_at(secs, canvas);
            scene.render_frame(&mut null, Some(pointer));
        }
        drop(scene);

        let gain = automation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let drone = self.opts.drone;
        let end_secs = self.cfg.fps.frames_to_secs(range.end.0);
        let pcm = drone.render(&gain, end_secs)?;
        let skip = frame_to_sample(range.start.0, self.cfg.fps, drone.sample_rate) as usize
            * usize::from(DRONE_CHANNELS);
        let pcm = pcm.get(skip..).unwrap_or_default();
        tracing::debug!(
            requests = gain.ramps().len(),
            samples = pcm.len(),
            path = %path.display(),
            "drone track written"
        );
        write_f32le_file(pcm, path)
    }
}

impl std::fmt::Debug for RenderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSession")
            .field("canvas", &self.surface.size())
            .field("frame", &self.scene.frame())
            .field("audio", &self.automation.is_some())
            .finish_non_exhaustive()
    }
}

/// Build a scene with the offline audio collaborator attached and armed when enabled.
fn build_scene(
    cfg: &SceneConfig,
    opts: &RenderSessionOpts,
) -> BreatheResult<(Scene, Option<Arc<Mutex<GainAutomation>>>)> {
    let mut scene = Scene::new(cfg)?;
    if !(opts.enable_audio && cfg.audio.enabled) {
        return Ok((scene, None));
    }
    let audio = OfflineAudio::new(cfg.fps);
    let automation = audio.automation();
    scene.attach_audio(Box::new(audio));
    scene.enable_audio();
    Ok((scene, Some(automation)))
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_session.rs"]
mod tests;
