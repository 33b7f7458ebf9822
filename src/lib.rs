//! Slidereel turns an ordered list of slides (one image plus one narration track each) into a
//! single vertical MP4.
//!
//! - Each slide lasts as long as its audio; consecutive slides overlap by a fixed transition.
//! - During the overlap the incoming image slides in from the right edge to the center.
//! - Audio tracks are mixed with the same overlap, frames are composited on the CPU and the
//!   result is streamed into a [`FrameSink`] (system `ffmpeg` via [`FfmpegSink`]).
//!
//! Entry points are [`assemble`] and [`assemble_to_mp4`].
#![forbid(unsafe_code)]

mod foundation;

/// Slide sources and media decoding.
pub mod assets;
pub(crate) mod audio;
pub mod config;
/// Encoding sinks.
pub mod encode;
/// JSON slide manifests.
pub mod manifest;
/// Output file naming.
pub mod output;
/// CPU compositing.
pub mod render;
/// Assembly entry points.
pub mod session;
/// Slide timing, transitions and tracks.
pub mod timeline;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Point, Resolution};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::assets::media::AudioPcm;
pub use crate::assets::source::{AudioSource, MediaSource, Slide};
pub use crate::config::AssembleConfig;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::render::compose::{FrameCompositor, FrameRGBA};
pub use crate::session::assemble::{AssembleReport, assemble, assemble_to_mp4};
pub use crate::timeline::timing::{SlideTiming, Timeline};
pub use crate::timeline::track::{TrackPlan, build_tracks};
pub use crate::timeline::transition::{Motion, Placement};
