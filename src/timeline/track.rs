use std::sync::Arc;

use crate::assets::adapter::PreparedSlide;
use crate::assets::decode::{PreparedImage, prepare_for_height};
use crate::assets::media::{AudioPcm, DEFAULT_SAMPLE_RATE};
use crate::foundation::core::{Canvas, Point, premultiply_rgba};
use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::timing::Timeline;
use crate::timeline::transition::{Motion, Placement};

#[derive(Clone, Debug)]
pub enum TrackContent {
    /// Opaque fill, premultiplied RGBA8.
    Background([u8; 4]),
    Image(PreparedImage),
}

/// One visual layer with its active window `[start_sec, start_sec + duration_sec)`.
#[derive(Clone, Debug)]
pub struct VideoTrack {
    pub slide: Option<usize>,
    pub content: TrackContent,
    pub start_sec: f64,
    pub duration_sec: f64,
    pub placement: Placement,
}

impl VideoTrack {
    pub fn end_sec(&self) -> f64 {
        self.start_sec + self.duration_sec
    }

    pub fn is_active(&self, t: f64) -> bool {
        t >= self.start_sec && t < self.end_sec()
    }

    /// Top-left corner at timeline time `t`.
    pub fn position_at(&self, t: f64) -> Point {
        self.placement.position(t - self.start_sec)
    }
}

/// One audio layer, placed at `start_sec` and never trimmed.
#[derive(Clone, Debug)]
pub struct AudioTrack {
    pub slide: usize,
    pub start_sec: f64,
    pub duration_sec: f64,
    pub pcm: Arc<AudioPcm>,
}

/// Everything the compositor needs for one output video.
#[derive(Clone, Debug)]
pub struct TrackPlan {
    pub canvas: Canvas,
    pub total_sec: f64,
    /// Mix rate: the highest source sample rate.
    pub sample_rate: u32,
    /// Bottom to top: background first, then slides in display order.
    pub video: Vec<VideoTrack>,
    pub audio: Vec<AudioTrack>,
}

/// Build the layered tracks for `slides` placed on `timeline`.
pub fn build_tracks(
    slides: &[PreparedSlide],
    timeline: &Timeline,
    canvas: Canvas,
    background_rgba: [u8; 4],
) -> ReelResult<TrackPlan> {
    if slides.len() != timeline.len() {
        return Err(ReelError::validation(format!(
            "timeline has {} slides but {} were prepared",
            timeline.len(),
            slides.len()
        )));
    }

    let mut bg = premultiply_rgba(background_rgba);
    bg[3] = 255;

    let mut video = Vec::with_capacity(slides.len() + 1);
    video.push(VideoTrack {
        slide: None,
        content: TrackContent::Background(bg),
        start_sec: 0.0,
        duration_sec: timeline.total_sec,
        placement: Placement::fill(canvas),
    });

    let mut audio = Vec::with_capacity(slides.len());
    for (slide, timing) in slides.iter().zip(&timeline.slides) {
        let image = prepare_for_height(&slide.image, canvas.height);
        let motion = if timing.index == 0 {
            Motion::Centered
        } else {
            Motion::SlideInFromRight {
                transition_sec: timeline.transition_sec,
            }
        };
        let placement = Placement::new(canvas, image.width, image.height, motion);

        video.push(VideoTrack {
            slide: Some(timing.index),
            content: TrackContent::Image(image),
            start_sec: timing.start_sec,
            duration_sec: timing.duration_sec,
            placement,
        });
        audio.push(AudioTrack {
            slide: timing.index,
            start_sec: timing.start_sec,
            duration_sec: slide.audio_duration_sec(),
            pcm: Arc::clone(&slide.audio),
        });
    }

    let rates: Vec<u32> = slides.iter().map(|s| s.source_sample_rate).collect();

    Ok(TrackPlan {
        canvas,
        total_sec: timeline.total_sec,
        sample_rate: output_sample_rate(&rates),
        video,
        audio,
    })
}

/// Highest of `rates`, or [`DEFAULT_SAMPLE_RATE`] when there are none.
///
/// Differing rates are not an error; every track is resampled to the returned rate.
pub fn output_sample_rate(rates: &[u32]) -> u32 {
    let Some(&max) = rates.iter().max() else {
        return DEFAULT_SAMPLE_RATE;
    };
    if rates.iter().any(|&r| r != max) {
        let mut distinct = rates.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        tracing::warn!(rates = ?distinct, chosen = max, "varying audio sample rates");
    }
    max
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/track.rs"]
mod tests;
