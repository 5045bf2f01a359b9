use super::*;
use crate::encode::sink::InMemorySink;
use crate::scene::model::AudioConfig;
use crate::shape::blob::BlobConfig;

fn small_cfg(audio: bool) -> SceneConfig {
    SceneConfig {
        canvas: Canvas::new(64, 48).unwrap(),
        duration_frames: 12,
        blobs: vec![
            BlobConfig {
                layers: 6,
                points: 24,
                ..BlobConfig::for_index(0)
            },
            BlobConfig {
                layers: 4,
                points: 24,
                ..BlobConfig::for_index(1)
            },
        ],
        seed: Some(5),
        audio: AudioConfig {
            enabled: audio,
            ..AudioConfig::default()
        },
        ..SceneConfig::default()
    }
}

fn range(start: u64, end: u64) -> FrameRange {
    FrameRange::new(FrameIndex(start), FrameIndex(end)).unwrap()
}

#[test]
fn frames_match_canvas_and_replay_deterministically() {
    let mut session = RenderSession::new(&small_cfg(false), RenderSessionOpts::default()).unwrap();
    let f3 = session.render_frame(FrameIndex(3)).unwrap();
    assert_eq!((f3.width, f3.height), (64, 48));
    assert_eq!(f3.data.len(), 64 * 48 * 4);
    assert!(f3.premultiplied);
    assert_eq!(session.scene().frame(), 4);

    // Going backwards rebuilds the scene and replays to the same state.
    let again = session.render_frame(FrameIndex(3)).unwrap();
    assert_eq!(f3.data, again.data);
}

#[test]
fn unset_seed_is_resolved_once_per_session() {
    let cfg = SceneConfig {
        seed: None,
        ..small_cfg(false)
    };
    let mut session = RenderSession::new(&cfg, RenderSessionOpts::default()).unwrap();
    assert!(session.config().seed.is_some());
    let a = session.render_frame(FrameIndex(1)).unwrap();
    let b = session.render_frame(FrameIndex(1)).unwrap();
    assert_eq!(a.data, b.data);
}

#[test]
fn render_range_streams_in_order_with_replay_stats() {
    let mut session = RenderSession::new(&small_cfg(false), RenderSessionOpts::default()).unwrap();
    let mut sink = InMemorySink::new();
    let stats = session.render_range(range(4, 8), &mut sink).unwrap();
    assert_eq!(
        stats,
        RenderStats {
            frames_total: 4,
            frames_rendered: 4,
            frames_replayed: 4,
        }
    );
    assert!(sink.is_ended());
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (64, 48));
    assert!(cfg.audio.is_none());
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![4, 5, 6, 7]);
    assert_ne!(sink.frames()[0].1.data, sink.frames()[3].1.data);
}

#[test]
fn range_frames_equal_single_frame_renders() {
    let mut a = RenderSession::new(&small_cfg(false), RenderSessionOpts::default()).unwrap();
    let mut sink = InMemorySink::new();
    a.render_range(range(0, 6), &mut sink).unwrap();

    let mut b = RenderSession::new(&small_cfg(false), RenderSessionOpts::default()).unwrap();
    let single = b.render_frame(FrameIndex(5)).unwrap();
    assert_eq!(sink.frames()[5].1.data, single.data);
}

#[test]
fn audio_range_hands_drone_track_to_sink() {
    let mut session = RenderSession::new(&small_cfg(true), RenderSessionOpts::default()).unwrap();
    assert!(session.scene().is_audio_armed());
    let mut sink = InMemorySink::new();
    session.render_range(range(0, 10), &mut sink).unwrap();

    let audio = sink.config().unwrap().audio.clone().unwrap();
    assert_eq!(audio.sample_rate, 48_000);
    assert_eq!(audio.channels, 2);
    // Temporary drone file is removed once the range is done.
    assert!(!audio.path.exists());

    let gain = session.gain_automation().unwrap();
    assert_eq!(gain.ramps().len(), 10);
    assert!(gain.ramps().iter().all(|r| r.target > 0.0 && r.target <= 1.0));
}

#[test]
fn audio_can_be_disabled_by_options() {
    let opts = RenderSessionOpts {
        enable_audio: false,
        ..RenderSessionOpts::default()
    };
    let session = RenderSession::new(&small_cfg(true), opts).unwrap();
    assert!(session.gain_automation().is_none());
    assert!(!session.scene().is_audio_armed());
}

#[test]
fn out_of_range_requests_are_rejected() {
    let mut session = RenderSession::new(&small_cfg(false), RenderSessionOpts::default()).unwrap();
    assert!(session.render_frame(FrameIndex(12)).is_err());
    assert!(session.render_frame(FrameIndex(11)).is_ok());
    let mut sink = InMemorySink::new();
    assert!(session.render_range(range(3, 3), &mut sink).is_err());
    assert!(session.render_range(range(0, 13), &mut sink).is_err());
}

#[test]
fn resize_changes_output_size() {
    let mut session = RenderSession::new(&small_cfg(false), RenderSessionOpts::default()).unwrap();
    session.render_frame(FrameIndex(0)).unwrap();
    session.resize(Canvas::new(32, 32).unwrap()).unwrap();
    let frame = session.render_frame(FrameIndex(1)).unwrap();
    assert_eq!((frame.width, frame.height), (32, 32));
    assert_eq!(session.scene().canvas(), Canvas::new(32, 32).unwrap());
}
