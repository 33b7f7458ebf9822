use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;

use crate::assets::decode::decode_image;
use crate::assets::media::{self, AudioPcm};
use crate::assets::source::{AudioSource, Slide};
use crate::foundation::error::{ReelError, ReelResult};

/// A slide with its image and audio decoded into memory.
#[derive(Clone, Debug)]
pub struct PreparedSlide {
    pub index: usize,
    pub title: Option<String>,
    pub image: Arc<RgbaImage>,
    pub audio: Arc<AudioPcm>,
    /// Sample rate of the source before decoding.
    pub source_sample_rate: u32,
}

impl PreparedSlide {
    pub fn audio_duration_sec(&self) -> f64 {
        self.audio.duration_sec()
    }
}

/// Resolve and decode every slide, in order, failing on the first bad one.
///
/// Encoded audio held in memory is written into `workdir` so ffmpeg can seek in it; the caller
/// owns `workdir` and removes it.
pub fn prepare_slides(slides: &[Slide], workdir: &Path) -> ReelResult<Vec<PreparedSlide>> {
    if slides.is_empty() {
        return Err(ReelError::EmptyTimeline);
    }

    let needs_ffmpeg = slides
        .iter()
        .any(|s| matches!(s.audio, AudioSource::Encoded(_)));
    if needs_ffmpeg && !(media::is_ffprobe_on_path() && media::is_ffmpeg_on_path()) {
        return Err(ReelError::encode(
            "ffmpeg and ffprobe are required to decode audio, but were not found on PATH",
        ));
    }

    slides
        .iter()
        .enumerate()
        .map(|(i, slide)| prepare_slide(i, slide, workdir))
        .collect()
}

fn prepare_slide(index: usize, slide: &Slide, workdir: &Path) -> ReelResult<PreparedSlide> {
    let image_bytes = slide.image.read_bytes(index, "image")?;
    let image = decode_image(&image_bytes)
        .map_err(|e| ReelError::media_decode(index, format!("image: {e:#}")))?;
    if image.width() == 0 || image.height() == 0 {
        return Err(ReelError::media_decode(index, "image has zero size"));
    }

    let (audio, source_sample_rate) = match &slide.audio {
        AudioSource::Encoded(src) => {
            let path = src.materialize(index, "audio", workdir, &format!("audio{index}.bin"))?;
            let probe = media::probe_audio(&path)
                .map_err(|e| ReelError::media_decode(index, format!("audio: {e:#}")))?;
            let pcm = media::decode_audio_f32_stereo(&path, probe.sample_rate)
                .map_err(|e| ReelError::media_decode(index, format!("audio: {e:#}")))?;
            if pcm.frames() == 0 {
                return Err(ReelError::media_decode(
                    index,
                    "audio decoded to zero samples",
                ));
            }
            (pcm, probe.sample_rate)
        }
        AudioSource::Pcm(pcm) => {
            if pcm.sample_rate == 0 || pcm.channels == 0 {
                return Err(ReelError::slide_validation(
                    index,
                    "pcm audio needs a non-zero sample rate and channel count",
                ));
            }
            if pcm.frames() == 0 {
                return Err(ReelError::slide_validation(index, "pcm audio is empty"));
            }
            (pcm.clone(), pcm.sample_rate)
        }
    };

    tracing::debug!(
        slide = index,
        image = %slide.image.describe(),
        width = image.width(),
        height = image.height(),
        audio_sec = audio.duration_sec(),
        sample_rate = source_sample_rate,
        "prepared slide"
    );

    Ok(PreparedSlide {
        index,
        title: slide.title.clone(),
        image: Arc::new(image),
        audio: Arc::new(audio),
        source_sample_rate,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/adapter.rs"]
mod tests;
