use super::*;

fn ramp(at_secs: f64, target: f64, ramp_secs: f64) -> GainRamp {
    GainRamp {
        at_secs,
        target,
        ramp_secs,
    }
}

#[test]
fn silent_before_first_request() {
    let mut a = GainAutomation::new();
    assert_eq!(a.value_at(3.0), 0.0);
    a.push(ramp(1.0, 0.8, 0.5));
    assert_eq!(a.value_at(0.5), 0.0);
    assert!((a.value_at(1.25) - 0.4).abs() < 1e-12);
    assert_eq!(a.value_at(2.0), 0.8);
}

#[test]
fn new_request_starts_from_reached_value() {
    let mut a = GainAutomation::new();
    a.push(ramp(0.0, 1.0, 1.0));
    // Interrupt halfway: the second ramp starts from 0.5.
    a.push(ramp(0.5, 0.0, 0.5));
    assert!((a.value_at(0.5) - 0.5).abs() < 1e-12);
    assert!((a.value_at(0.75) - 0.25).abs() < 1e-12);
    assert_eq!(a.value_at(1.0), 0.0);
}

#[test]
fn push_clamps_target_and_time_order() {
    let mut a = GainAutomation::new();
    a.push(ramp(1.0, 3.0, -1.0));
    a.push(ramp(0.2, -0.5, 0.1));
    assert_eq!(a.ramps()[0].target, 1.0);
    assert_eq!(a.ramps()[0].ramp_secs, 0.0);
    assert_eq!(a.ramps()[1].at_secs, 1.0);
    assert_eq!(a.ramps()[1].target, 0.0);
    assert!((a.end_secs() - 1.1).abs() < 1e-12);
}

#[test]
fn sample_matches_value_at() {
    let mut a = GainAutomation::new();
    a.push(ramp(0.0, 0.6, 0.15));
    a.push(ramp(0.1, 0.2, 0.15));
    a.push(ramp(0.3, 0.9, 0.0));
    let rate = 1000;
    let samples = a.sample(rate, 0.5);
    assert_eq!(samples.len(), 500);
    for (n, s) in samples.iter().enumerate() {
        let want = a.value_at(n as f64 / f64::from(rate)) as f32;
        assert!((s - want).abs() < 1e-6, "sample {n}: {s} vs {want}");
    }
}

#[test]
fn offline_audio_stamps_one_request_per_frame() {
    let mut audio = OfflineAudio::new(Fps::new(50, 1).unwrap());
    let shared = audio.automation();
    assert!(!audio.is_started());
    audio.start().unwrap();
    assert!(audio.is_started());
    for _ in 0..3 {
        audio.set_gain_target(0.5, 150.0);
    }
    audio.stop();
    assert!(!audio.is_started());

    let recorded = shared.lock().unwrap();
    for (k, r) in recorded.ramps().iter().enumerate() {
        assert!((r.at_secs - k as f64 * 0.02).abs() < 1e-12);
    }
    assert!(recorded.ramps().iter().all(|r| (r.ramp_secs - 0.15).abs() < 1e-12));
    drop(recorded);
    assert_eq!(audio.snapshot().ramps().len(), 3);
}
