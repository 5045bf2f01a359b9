//! Breathe renders layered, noise-deformed blobs that breathe and drift in color.
//!
//! Each blob is a stack of translucent contours. A sine oscillator drives their radii, a seeded
//! noise field deforms their outlines, and the pointer position steers hue and saturation.
//! The optional audio collaborator follows the last blob's breath.
//!
//! The public API mirrors the frame loop:
//!
//! - Describe a scene with [`SceneConfig`] (JSON via `serde`)
//! - Drive it directly with [`Scene::render_frame`] on any [`RenderSurface`]
//! - Or render offline through a [`RenderSession`] into a [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Time-varying signals.
pub mod animation;
/// Breath-following audio.
pub mod audio;
/// Encoding sinks.
pub mod encode;
/// Core value types.
pub mod foundation;
/// Pointer input.
pub mod input;
/// Drawing surfaces.
pub mod render;
/// Scene model and runtime.
pub mod scene;
/// Session-oriented rendering API.
pub mod session;
/// Blob geometry.
pub mod shape;

pub use crate::animation::breath::BreathOscillator;
pub use crate::animation::clock::FrameClock;
pub use crate::animation::color::{ColorDrifter, Smoothing};
pub use crate::animation::noise::{ConstantNoise, NoiseField, NoiseSource};
pub use crate::audio::automation::{GainAutomation, OfflineAudio};
pub use crate::audio::drone::DroneSynth;
pub use crate::audio::sink::AudioSink;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{
    AudioInputConfig, FrameSink, InMemorySink, PngSequenceSink, SinkConfig,
};
pub use crate::foundation::color::Hsba;
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Point, Vec2};
pub use crate::foundation::error::{BreatheError, BreatheResult};
pub use crate::input::pointer::PointerPath;
pub use crate::render::cpu::CpuSurface;
pub use crate::render::surface::{FrameRGBA, NullSurface, RecordingSurface, RenderSurface};
pub use crate::scene::model::{AudioConfig, ResizePolicy, SceneConfig};
pub use crate::scene::runtime::{FrameReport, Scene};
pub use crate::session::render_session::{RenderSession, RenderSessionOpts, RenderStats};
pub use crate::shape::blob::{Blob, BlobConfig, BlobRadius};
pub use crate::shape::layer::Layer;
