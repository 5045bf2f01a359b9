use crate::audio::sink::AudioSink;
use crate::foundation::core::Fps;
use crate::foundation::error::BreatheResult;
use std::sync::{Arc, Mutex, PoisonError};

/// One recorded "ramp to `target` over `ramp_secs`" request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GainRamp {
    /// Timeline time the request was issued at.
    pub at_secs: f64,
    /// Gain reached at the end of the ramp.
    pub target: f64,
    /// Ramp duration. Zero jumps straight to `target`.
    pub ramp_secs: f64,
}

impl GainRamp {
    fn value_at(&self, from: f64, t: f64) -> f64 {
        if self.ramp_secs <= 0.0 || t >= self.at_secs + self.ramp_secs {
            return self.target;
        }
        let u = ((t - self.at_secs) / self.ramp_secs).clamp(0.0, 1.0);
        from + (self.target - from) * u
    }
}

/// Gain envelope built from ramp requests issued in timeline order.
///
/// A new request starts from whatever value the previous ramp had reached at that moment,
/// which is how a scheduled audio parameter behaves when ramps are cancelled and replaced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GainAutomation {
    ramps: Vec<GainRamp>,
}

impl GainAutomation {
    /// Empty envelope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a request. Requests earlier than the last recorded one are clamped to it.
    pub fn push(&mut self, mut ramp: GainRamp) {
        if let Some(last) = self.ramps.last() {
            ramp.at_secs = ramp.at_secs.max(last.at_secs);
        }
        ramp.target = ramp.target.clamp(0.0, 1.0);
        ramp.ramp_secs = ramp.ramp_secs.max(0.0);
        self.ramps.push(ramp);
    }

    /// Recorded ramps in timeline order.
    pub fn ramps(&self) -> &[GainRamp] {
        &self.ramps
    }

    /// True before the first request.
    pub fn is_empty(&self) -> bool {
        self.ramps.is_empty()
    }

    /// Time at which the last ramp settles.
    pub fn end_secs(&self) -> f64 {
        self.ramps
            .last()
            .map(|r| r.at_secs + r.ramp_secs)
            .unwrap_or(0.0)
    }

    /// Gain at timeline time `t`. Silent before the first request.
    pub fn value_at(&self, t: f64) -> f64 {
        let mut level = 0.0;
        let mut active: Option<(&GainRamp, f64)> = None;
        for ramp in &self.ramps {
            if ramp.at_secs > t {
                break;
            }
            if let Some((prev, from)) = active {
                level = prev.value_at(from, ramp.at_secs);
            }
            active = Some((ramp, level));
        }
        match active {
            Some((ramp, from)) => ramp.value_at(from, t),
            None => 0.0,
        }
    }

    /// Sample the envelope at `sample_rate`, one value per sample frame over `[0, duration_secs)`.
    pub fn sample(&self, sample_rate: u32, duration_secs: f64) -> Vec<f32> {
        let frames = (duration_secs.max(0.0) * f64::from(sample_rate)).round() as usize;
        let mut out = Vec::with_capacity(frames);
        let mut cursor = 0usize;
        let mut from = 0.0;
        for n in 0..frames {
            let t = n as f64 / f64::from(sample_rate);
            // Walk the ramp list incrementally instead of rescanning per sample.
            while cursor + 1 < self.ramps.len() && self.ramps[cursor + 1].at_secs <= t {
                from = self.ramps[cursor].value_at(from, self.ramps[cursor + 1].at_secs);
                cursor += 1;
            }
            let v = match self.ramps.get(cursor) {
                Some(ramp) if ramp.at_secs <= t => ramp.value_at(from, t),
                _ => 0.0,
            };
            out.push(v as f32);
        }
        out
    }
}

/// Offline audio collaborator: records gain requests instead of playing them.
///
/// Each request is stamped with the timeline time of the frame that issued it, assuming one
/// request per rendered frame at `fps`. The automation is shared so a render session can read
/// it back after the scene has been driven.
#[derive(Debug)]
pub struct OfflineAudio {
    fps: Fps,
    automation: Arc<Mutex<GainAutomation>>,
    requests: u64,
    started: bool,
}

impl OfflineAudio {
    /// Recorder that timestamps requests by frame at `fps`.
    pub fn new(fps: Fps) -> Self {
        Self {
            fps,
            automation: Arc::new(Mutex::new(GainAutomation::new())),
            requests: 0,
            started: false,
        }
    }

    /// Shared handle to the recorded automation.
    pub fn automation(&self) -> Arc<Mutex<GainAutomation>> {
        Arc::clone(&self.automation)
    }

    /// True once `start` has been called and `stop` has not.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Copy of the automation recorded so far.
    pub fn snapshot(&self) -> GainAutomation {
        self.automation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AudioSink for OfflineAudio {
    fn start(&mut self) -> BreatheResult<()> {
        self.started = true;
        tracing::debug!("offline audio started");
        Ok(())
    }

    fn stop(&mut self) {
        if self.started {
            tracing::debug!(requests = self.requests, "offline audio stopped");
        }
        self.started = false;
    }

    fn set_gain_target(&mut self, value: f64, ramp_ms: f64) {
        let at_secs = self.fps.frames_to_secs(self.requests);
        self.requests += 1;
        self.automation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(GainRamp {
                at_secs,
                target: value,
                ramp_secs: ramp_ms / 1000.0,
            });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/automation.rs"]
mod tests;
