use super::*;
use crate::animation::noise::ConstantNoise;
use crate::foundation::error::BreatheError;
use crate::render::surface::{DrawCommand, NullSurface, RecordingSurface};
use crate::shape::blob::{BlobConfig, BlobRadius};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Log {
    starts: u32,
    stops: u32,
    requests: Vec<(f64, f64)>,
}

struct FakeSink {
    log: Arc<Mutex<Log>>,
    fail_start: bool,
}

impl AudioSink for FakeSink {
    fn start(&mut self) -> BreatheResult<()> {
        if self.fail_start {
            return Err(BreatheError::audio("device refused to start"));
        }
        self.log.lock().unwrap().starts += 1;
        Ok(())
    }

    fn stop(&mut self) {
        self.log.lock().unwrap().stops += 1;
    }

    fn set_gain_target(&mut self, value: f64, ramp_ms: f64) {
        self.log.lock().unwrap().requests.push((value, ramp_ms));
    }
}

fn fake_sink(fail_start: bool) -> (Box<dyn AudioSink>, Arc<Mutex<Log>>) {
    let log = Arc::new(Mutex::new(Log::default()));
    let sink = FakeSink {
        log: Arc::clone(&log),
        fail_start,
    };
    (Box::new(sink), log)
}

fn one_blob(layers: u32, points: u32) -> SceneConfig {
    SceneConfig {
        blobs: vec![BlobConfig {
            layers,
            points,
            ..BlobConfig::default()
        }],
        seed: Some(3),
        ..SceneConfig::default()
    }
}

#[test]
fn breath_returns_after_one_full_cycle() {
    let mut scene = Scene::with_noise(&one_blob(60, 160), ConstantNoise(0.5)).unwrap();
    let mut surface = NullSurface::new(scene.canvas());
    let start = scene.blobs()[0].breath().value();
    let mut last = None;
    for _ in 0..480 {
        last = Some(scene.render_frame(&mut surface, Some(Point::new(400.0, 300.0))));
    }
    let report = last.unwrap();
    assert_eq!(report.frame, 480);
    assert!((report.dt - 1.0 / 60.0).abs() < 1e-15);
    assert!(
        (report.breath - start).abs() < 1e-3,
        "{} vs {start}",
        report.breath
    );
}

#[test]
fn corner_pointer_drives_color_targets() {
    let mut scene = Scene::with_noise(&one_blob(4, 16), ConstantNoise(0.5)).unwrap();
    let mut surface = NullSurface::new(scene.canvas());
    let corner = Some(Point::new(800.0, 0.0));
    for _ in 0..200 {
        scene.render_frame(&mut surface, corner);
    }
    let drifter = *scene.blobs()[0].drifter();
    assert!((drifter.sat() - 30.0).abs() < 1.0, "sat {}", drifter.sat());

    for _ in 200..300 {
        scene.render_frame(&mut surface, corner);
    }
    let drifter = *scene.blobs()[0].drifter();
    assert!((drifter.hue() - 360.0).abs() < 1.0, "hue {}", drifter.hue());
}

#[test]
fn unset_pointer_resolves_to_center() {
    let mut scene = Scene::with_noise(&one_blob(2, 8), ConstantNoise(0.5)).unwrap();
    let mut surface = NullSurface::new(scene.canvas());
    for _ in 0..50 {
        scene.render_frame(&mut surface, None);
    }
    let drifter = scene.blobs()[0].drifter();
    assert!((drifter.hue() - 180.0).abs() < 1e-9);
    assert!(drifter.sat() > 60.0 && drifter.sat() < 65.0);
}

#[test]
fn frame_clears_then_draws_blobs_in_order() {
    let cfg = SceneConfig {
        blobs: vec![
            BlobConfig {
                layers: 3,
                points: 12,
                ..BlobConfig::for_index(0)
            },
            BlobConfig {
                layers: 2,
                points: 12,
                ..BlobConfig::for_index(1)
            },
        ],
        seed: Some(1),
        ..SceneConfig::default()
    };
    let mut scene = Scene::new(&cfg).unwrap();
    let mut surface = RecordingSurface::new(scene.canvas());
    let report = scene.render_frame(&mut surface, None);
    assert_eq!(report.polygons, 5);
    assert_eq!(report.gain, None);
    let commands = surface.commands();
    assert_eq!(commands.len(), 6);
    assert_eq!(commands[0], DrawCommand::Clear(cfg.background));
    // Second blob's hue shift is visible in its fills.
    let hue_of = |c: &DrawCommand| match c {
        DrawCommand::Fill { color, .. } => color.h,
        DrawCommand::Clear(_) => f64::NAN,
    };
    let first_blob_outer = hue_of(&commands[1]);
    let second_blob_outer = hue_of(&commands[4]);
    assert!((second_blob_outer - first_blob_outer - 25.0 + 3.0).abs() < 1e-9);
}

#[test]
fn audio_follows_breath_only_when_armed_and_unmuted() {
    let mut scene = Scene::new(&one_blob(2, 8)).unwrap();
    let mut surface = NullSurface::new(scene.canvas());
    let (sink, log) = fake_sink(false);
    scene.attach_audio(sink);

    let silent = scene.render_frame(&mut surface, None);
    assert_eq!(silent.gain, Some(0.0));

    assert!(scene.enable_audio());
    assert!(scene.is_audio_armed());
    let live = scene.render_frame(&mut surface, None);
    let want = (0.3 + live.breath * 0.7).clamp(0.0, 1.0);
    assert!((live.gain.unwrap() - want).abs() < 1e-12);

    scene.set_muted(true);
    assert_eq!(scene.render_frame(&mut surface, None).gain, Some(0.0));

    drop(scene);
    let log = log.lock().unwrap();
    assert_eq!(log.starts, 1);
    assert_eq!(log.stops, 1);
    assert_eq!(log.requests.len(), 3);
    assert!(log.requests.iter().all(|&(_, ramp)| ramp == 150.0));
}

#[test]
fn failed_audio_start_keeps_rendering_and_mute_state() {
    let mut scene = Scene::new(&one_blob(2, 8)).unwrap();
    let mut surface = NullSurface::new(scene.canvas());
    let (sink, log) = fake_sink(true);
    scene.attach_audio(sink);
    scene.set_muted(false);

    assert!(!scene.enable_audio());
    assert!(!scene.is_audio_armed());
    assert!(!scene.is_muted());
    let report = scene.render_frame(&mut surface, None);
    assert_eq!(report.gain, Some(0.0));
    assert_eq!(report.frame, 1);
    drop(scene);
    assert_eq!(log.lock().unwrap().stops, 0);
}

#[test]
fn enable_without_sink_is_a_no_op() {
    let mut scene = Scene::new(&one_blob(2, 8)).unwrap();
    assert!(!scene.enable_audio());
}

#[test]
fn resize_follows_policy_and_keeps_state() {
    for (policy, want) in [
        (ResizePolicy::FreezeBaseRadius, 800.0 * 0.12),
        (ResizePolicy::RecomputeBaseRadius, 1000.0 * 0.12),
    ] {
        let cfg = SceneConfig {
            resize: policy,
            ..one_blob(3, 12)
        };
        let mut scene = Scene::new(&cfg).unwrap();
        let mut surface = NullSurface::new(scene.canvas());
        for _ in 0..30 {
            scene.render_frame(&mut surface, None);
        }
        let phase = scene.blobs()[0].breath().phase();

        let bigger = Canvas::new(1000, 600).unwrap();
        scene.resize(bigger);
        scene.resize(bigger);
        assert_eq!(scene.canvas(), bigger);
        assert!((scene.blobs()[0].base_radius() - want).abs() < 1e-9);
        assert_eq!(scene.blobs()[0].breath().phase(), phase);
        assert_eq!(scene.frame(), 30);
    }
}

#[test]
fn surface_size_change_is_picked_up_on_render() {
    let cfg = SceneConfig {
        resize: ResizePolicy::RecomputeBaseRadius,
        ..one_blob(2, 8)
    };
    let mut scene = Scene::new(&cfg).unwrap();
    let mut surface = NullSurface::new(Canvas::new(400, 300).unwrap());
    scene.render_frame(&mut surface, None);
    assert_eq!(scene.canvas(), Canvas::new(400, 300).unwrap());
    assert!((scene.blobs()[0].base_radius() - 48.0).abs() < 1e-9);
}

#[test]
fn pixel_radius_ignores_recompute_policy() {
    let mut cfg = SceneConfig {
        resize: ResizePolicy::RecomputeBaseRadius,
        ..one_blob(2, 8)
    };
    cfg.blobs[0].radius = BlobRadius::Pixels(70.0);
    let mut scene = Scene::new(&cfg).unwrap();
    scene.resize(Canvas::new(1600, 900).unwrap());
    assert_eq!(scene.blobs()[0].base_radius(), 70.0);
}

#[test]
fn reported_fps_scales_dt() {
    let mut scene = Scene::new(&one_blob(2, 8)).unwrap();
    let mut surface = NullSurface::new(scene.canvas());
    scene.set_reported_fps(Some(30.0));
    assert!((scene.render_frame(&mut surface, None).dt - 1.0 / 30.0).abs() < 1e-15);
    scene.set_reported_fps(None);
    assert_eq!(scene.frame_rate(), 60.0);
}

#[test]
fn degenerate_config_fails_fast() {
    assert!(matches!(
        Scene::new(&one_blob(0, 160)),
        Err(BreatheError::Config(_))
    ));
    assert!(Scene::new(&one_blob(4, 2)).is_err());
}
