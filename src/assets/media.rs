use std::path::Path;

use anyhow::{Context as _, bail};

/// Used when no input track reports a sample rate.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Decoded interleaved audio.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioPcm {
    pub sample_rate: u32,
    pub channels: u16,
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    pub fn new(sample_rate: u32, channels: u16, interleaved_f32: Vec<f32>) -> Self {
        Self {
            sample_rate,
            channels,
            interleaved_f32,
        }
    }

    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.interleaved_f32.len() / usize::from(self.channels)
    }

    pub fn duration_sec(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        (self.frames() as f64) / f64::from(self.sample_rate)
    }
}

/// Stream facts reported by `ffprobe` for the first audio stream of a file.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioProbe {
    pub sample_rate: u32,
}

pub fn probe_audio(path: &Path) -> anyhow::Result<AudioProbe> {
    let out = std::process::Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json", "-show_streams"])
        .arg(path)
        .output()
        .context("failed to run ffprobe")?;
    if !out.status.success() {
        bail!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        );
    }
    parse_audio_probe(&out.stdout)
        .with_context(|| format!("unusable ffprobe output for '{}'", path.display()))
}

/// Parse `ffprobe -print_format json -show_streams` output.
pub(crate) fn parse_audio_probe(json: &[u8]) -> anyhow::Result<AudioProbe> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        sample_rate: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        #[serde(default)]
        streams: Vec<ProbeStream>,
    }

    let parsed: ProbeOut = serde_json::from_slice(json).context("ffprobe json parse failed")?;
    let stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"))
        .context("no audio stream found")?;

    let sample_rate = stream
        .sample_rate
        .as_deref()
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|&r| r > 0)
        .context("missing audio sample_rate from ffprobe")?;

    Ok(AudioProbe { sample_rate })
}

/// Decode the first audio stream of `path` to interleaved stereo `f32` at `sample_rate`.
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> anyhow::Result<AudioPcm> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "2",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .context("failed to run ffmpeg for audio decode")?;

    if !out.status.success() {
        bail!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        );
    }

    Ok(AudioPcm::new(sample_rate, 2, f32le_to_samples(&out.stdout)?))
}

pub(crate) fn f32le_to_samples(bytes: &[u8]) -> anyhow::Result<Vec<f32>> {
    if !bytes.len().is_multiple_of(4) {
        bail!("decoded audio byte length is not aligned to f32 samples");
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Return `true` when `tool -version` runs successfully from `PATH`.
pub fn is_tool_on_path(tool: &str) -> bool {
    std::process::Command::new(tool)
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn is_ffmpeg_on_path() -> bool {
    is_tool_on_path("ffmpeg")
}

pub fn is_ffprobe_on_path() -> bool {
    is_tool_on_path("ffprobe")
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
