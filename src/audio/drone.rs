use crate::audio::automation::GainAutomation;
use crate::foundation::core::Fps;
use crate::foundation::error::{BreatheError, BreatheResult};
use std::f64::consts::TAU;
use std::path::Path;

/// Output sample rate of rendered drone audio.
pub const DRONE_SAMPLE_RATE: u32 = 48_000;
/// Output channel count of rendered drone audio (interleaved stereo).
pub const DRONE_CHANNELS: u16 = 2;

const MASTER_LEVEL: f64 = 0.5;
const NOISE_LEVEL: f64 = 0.3;
const CUTOFF_MIN_HZ: f64 = 200.0;
const CUTOFF_MAX_HZ: f64 = 1800.0;

/// One sine partial of the drone: frequency ratio to the fundamental, detune, level and pan.
#[derive(Clone, Copy, Debug)]
struct Partial {
    ratio: f64,
    cents: f64,
    level: f64,
    pan: f64,
}

const PARTIALS: [Partial; 5] = [
    Partial {
        ratio: 1.0,
        cents: -4.0,
        level: 0.5,
        pan: -0.3,
    },
    Partial {
        ratio: 1.0,
        cents: 4.0,
        level: 0.5,
        pan: 0.3,
    },
    Partial {
        ratio: 1.5,
        cents: -2.0,
        level: 0.25,
        pan: -0.1,
    },
    Partial {
        ratio: 2.0,
        cents: 3.0,
        level: 0.18,
        pan: 0.2,
    },
    Partial {
        ratio: 3.0,
        cents: -5.0,
        level: 0.08,
        pan: 0.0,
    },
];

/// Breath-driven drone texture: detuned sine partials plus low-passed noise.
///
/// The gain envelope scales the whole texture and opens the noise filter as it rises, so the
/// drone gets brighter on the inhale.
#[derive(Clone, Copy, Debug)]
pub struct DroneSynth {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Fundamental frequency in Hz.
    pub base_hz: f64,
    /// Seed of the noise generator.
    pub seed: u64,
}

impl Default for DroneSynth {
    fn default() -> Self {
        Self {
            sample_rate: DRONE_SAMPLE_RATE,
            base_hz: 55.0,
            seed: 0x6272_6561_7468,
        }
    }
}

impl DroneSynth {
    /// Render `duration_secs` of interleaved stereo `f32` PCM following `gain`.
    pub fn render(&self, gain: &GainAutomation, duration_secs: f64) -> BreatheResult<Vec<f32>> {
        if self.sample_rate == 0 {
            return Err(BreatheError::audio("drone sample_rate must be non-zero"));
        }
        if !self.base_hz.is_finite() || self.base_hz <= 0.0 {
            return Err(BreatheError::audio(format!(
                "drone base frequency must be finite and > 0 (got {})",
                self.base_hz
            )));
        }

        let sr = f64::from(self.sample_rate);
        let envelope = gain.sample(self.sample_rate, duration_secs);
        let steps: Vec<f64> = PARTIALS
            .iter()
            .map(|p| self.base_hz * p.ratio * 2f64.powf(p.cents / 1200.0) / sr)
            .collect();
        let mut phases = [0.0f64; PARTIALS.len()];
        let mut rng = fastrand::Rng::with_seed(self.seed);
        let mut lowpassed = 0.0f64;

        let mut out = Vec::with_capacity(envelope.len() * usize::from(DRONE_CHANNELS));
        for &g in &envelope {
            let g = f64::from(g);

            let (mut left, mut right) = (0.0, 0.0);
            for ((partial, phase), step) in PARTIALS.iter().zip(&mut phases).zip(&steps) {
                let s = (TAU * *phase).sin() * partial.level;
                left += s * (1.0 - partial.pan) * 0.5;
                right += s * (1.0 + partial.pan) * 0.5;
                *phase = (*phase + step).fract();
            }

            let cutoff = CUTOFF_MIN_HZ + (CUTOFF_MAX_HZ - CUTOFF_MIN_HZ) * g;
            let alpha = 1.0 - (-TAU * cutoff / sr).exp();
            let white = rng.f64() * 2.0 - 1.0;
            lowpassed += alpha * (white - lowpassed);
            let noise = lowpassed * NOISE_LEVEL;

            let scale = g * MASTER_LEVEL;
            out.push(((left + noise) * scale).clamp(-1.0, 1.0) as f32);
            out.push(((right + noise) * scale).clamp(-1.0, 1.0) as f32);
        }
        Ok(out)
    }
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub fn write_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> BreatheResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            BreatheError::audio(format!(
                "failed to create audio output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        BreatheError::audio(format!(
            "failed to write audio file '{}': {e}",
            out_path.display()
        ))
    })
}

/// Convert a frame count to the nearest sample index at `sample_rate`.
pub fn frame_to_sample(frames: u64, fps: Fps, sample_rate: u32) -> u64 {
    let num = u128::from(frames) * u128::from(sample_rate) * u128::from(fps.den);
    let den = u128::from(fps.num);
    ((num + (den / 2)) / den) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/audio/drone.rs"]
mod tests;
