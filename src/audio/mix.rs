use std::path::Path;
use std::sync::Arc;

use crate::assets::media::AudioPcm;
use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::track::TrackPlan;

/// Output channel count of the mix.
pub const MIX_CHANNELS: u16 = 2;

#[derive(Clone, Debug)]
/// One audio track scheduled in output sample space.
pub(crate) struct AudioSegment {
    pub(crate) timeline_start_sample: u64,
    pub(crate) timeline_end_sample: u64,
    pub(crate) source: Arc<AudioPcm>,
}

#[derive(Clone, Debug)]
/// Audio mixing plan for a whole output video.
pub(crate) struct AudioMix {
    pub(crate) sample_rate: u32,
    pub(crate) channels: u16,
    pub(crate) total_samples: u64,
    pub(crate) segments: Vec<AudioSegment>,
}

/// Schedule every audio track of `plan` at the plan sample rate.
pub(crate) fn build_audio_mix(plan: &TrackPlan) -> AudioMix {
    let rate = plan.sample_rate;
    let total_samples = secs_to_sample(plan.total_sec, rate);
    let segments = plan
        .audio
        .iter()
        .map(|t| {
            let start = secs_to_sample(t.start_sec, rate);
            let end = secs_to_sample(t.start_sec + t.duration_sec, rate).min(total_samples);
            AudioSegment {
                timeline_start_sample: start,
                timeline_end_sample: end,
                source: Arc::clone(&t.pcm),
            }
        })
        .collect();

    AudioMix {
        sample_rate: rate,
        channels: MIX_CHANNELS,
        total_samples,
        segments,
    }
}

/// Sum all segments into interleaved output PCM, clamped to `[-1, 1]`.
pub(crate) fn mix_segments(mix: &AudioMix) -> Vec<f32> {
    let frames = mix.total_samples as usize;
    let mut out = vec![0.0f32; frames * usize::from(mix.channels)];

    for seg in &mix.segments {
        mix_segment(&mut out, mix, seg);
    }

    for s in &mut out {
        *s = s.clamp(-1.0, 1.0);
    }
    out
}

fn mix_segment(out: &mut [f32], mix: &AudioMix, seg: &AudioSegment) {
    let src = &seg.source.interleaved_f32;
    let src_channels = usize::from(seg.source.channels);
    let src_frames = seg.source.frames();
    if src_frames == 0 || seg.timeline_end_sample <= seg.timeline_start_sample {
        return;
    }

    // Source frames advanced per output sample.
    let step = f64::from(seg.source.sample_rate) / f64::from(mix.sample_rate);

    for dst_sample in seg.timeline_start_sample..seg.timeline_end_sample {
        let rel_sample = dst_sample - seg.timeline_start_sample;
        let src_pos = (rel_sample as f64) * step;
        let src_frame0 = src_pos.floor() as usize;
        if src_frame0 >= src_frames {
            break;
        }
        let src_frame1 = (src_frame0 + 1).min(src_frames - 1);
        let frac = (src_pos - src_frame0 as f64) as f32;

        let (l, r) = if src_channels == 1 {
            let v0 = src[src_frame0];
            let v1 = src[src_frame1];
            let v = v0 + ((v1 - v0) * frac);
            (v, v)
        } else {
            let i0 = src_frame0 * src_channels;
            let i1 = src_frame1 * src_channels;
            let l0 = src[i0];
            let l1 = src[i1];
            let r0 = src[i0 + 1];
            let r1 = src[i1 + 1];
            (l0 + ((l1 - l0) * frac), r0 + ((r1 - r0) * frac))
        };

        let dst_idx = dst_sample as usize * usize::from(mix.channels);
        if dst_idx >= out.len() {
            break;
        }
        out[dst_idx] += l;
        if mix.channels > 1 {
            out[dst_idx + 1] += r;
        }
    }
}

/// Write interleaved `f32` PCM samples to raw little-endian `.f32le` file.
pub(crate) fn write_mix_to_f32le_file(
    samples_interleaved: &[f32],
    out_path: &Path,
) -> ReelResult<()> {
    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        ReelError::encode(format!(
            "failed to write mixed audio file '{}': {e}",
            out_path.display()
        ))
    })
}

/// Nearest sample index for `secs` at `sample_rate`.
pub(crate) fn secs_to_sample(secs: f64, sample_rate: u32) -> u64 {
    (secs * f64::from(sample_rate)).round().max(0.0) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
