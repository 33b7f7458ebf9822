use std::path::PathBuf;

use anyhow::Context as _;

use crate::assets::adapter::prepare_slides;
use crate::assets::source::Slide;
use crate::audio::mix::{build_audio_mix, mix_segments, write_mix_to_f32le_file};
use crate::config::AssembleConfig;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::compose::{FrameCompositor, FrameRGBA};
use crate::timeline::timing::Timeline;
use crate::timeline::track::build_tracks;

/// Summary of one finished assembly.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AssembleReport {
    pub timeline: Timeline,
    pub canvas: Canvas,
    pub fps: Fps,
    pub frame_count: u64,
    pub sample_rate: u32,
    pub video_tracks: usize,
    pub audio_tracks: usize,
    /// Set when the video was written to disk.
    pub out_path: Option<PathBuf>,
}

/// Assemble `slides` into timed tracks and stream the composite into `sink`.
///
/// All-or-nothing: the first bad slide aborts the call and `sink.end` is only reached when every
/// frame was accepted. Decoded media and the mixed audio live in a temporary directory that is
/// removed before this returns, on success and on error.
#[tracing::instrument(skip_all, fields(slides = slides.len()))]
pub fn assemble(
    slides: &[Slide],
    cfg: &AssembleConfig,
    sink: &mut dyn FrameSink,
) -> ReelResult<AssembleReport> {
    cfg.validate()?;
    if slides.is_empty() {
        return Err(ReelError::EmptyTimeline);
    }

    let workdir = tempfile::Builder::new()
        .prefix("slidereel-")
        .tempdir()
        .context("failed to create temporary working directory")?;

    let prepared = prepare_slides(slides, workdir.path())?;
    let durations: Vec<f64> = prepared.iter().map(|s| s.audio_duration_sec()).collect();
    let timeline = Timeline::compute(&durations, cfg.transition_sec)?;

    for (slide, timing) in prepared.iter().zip(&timeline.slides) {
        tracing::info!(
            slide = timing.index,
            title = slide.title.as_deref().unwrap_or(""),
            start_sec = timing.start_sec,
            duration_sec = timing.duration_sec,
            "placed slide"
        );
    }

    let canvas = cfg.canvas();
    let plan = build_tracks(&prepared, &timeline, canvas, cfg.background_rgba)?;
    drop(prepared);

    let mix = build_audio_mix(&plan);
    let audio_path = workdir.path().join("mix.f32le");
    write_mix_to_f32le_file(&mix_segments(&mix), &audio_path)?;

    let compositor = FrameCompositor::new(&plan, cfg.fps);
    let frame_count = compositor.frame_count();
    tracing::info!(
        total_sec = plan.total_sec,
        frames = frame_count,
        width = canvas.width,
        height = canvas.height,
        sample_rate = mix.sample_rate,
        "assembling video"
    );

    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps: cfg.fps,
        frame_count,
        audio: Some(AudioInputConfig {
            path: audio_path,
            sample_rate: mix.sample_rate,
            channels: mix.channels,
        }),
        title: cfg.title.clone(),
    })?;

    let mut frame = FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data: Vec::new(),
        premultiplied: true,
    };
    for i in 0..frame_count {
        let idx = FrameIndex(i);
        compositor.render_frame_into(idx, &mut frame);
        sink.push_frame(idx, &frame)?;
    }
    sink.end()?;

    Ok(AssembleReport {
        timeline,
        canvas,
        fps: cfg.fps,
        frame_count,
        sample_rate: mix.sample_rate,
        video_tracks: plan.video.len(),
        audio_tracks: plan.audio.len(),
        out_path: None,
    })
}

/// [`assemble`] into an MP4 at `cfg.out_path` using the system `ffmpeg`.
///
/// The output path is only created once the encode succeeded.
pub fn assemble_to_mp4(slides: &[Slide], cfg: &AssembleConfig) -> ReelResult<AssembleReport> {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: cfg.out_path.clone(),
        overwrite: cfg.overwrite,
        bg_rgba: cfg.background_rgba,
    });
    let mut report = assemble(slides, cfg, &mut sink)?;
    tracing::info!(out = %cfg.out_path.display(), "video saved");
    report.out_path = Some(cfg.out_path.clone());
    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/unit/session/assemble.rs"]
mod tests;
