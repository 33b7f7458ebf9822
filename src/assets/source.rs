use std::path::{Path, PathBuf};

use base64::Engine as _;

use crate::assets::media::AudioPcm;
use crate::foundation::error::{ReelError, ReelResult};

/// Where the bytes of one image or encoded audio clip come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
    /// Standard base64 text (surrounding whitespace is ignored).
    Base64(String),
}

impl MediaSource {
    pub fn path(p: impl Into<PathBuf>) -> Self {
        Self::Path(p.into())
    }

    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(b.into())
    }

    pub fn base64(s: impl Into<String>) -> Self {
        Self::Base64(s.into())
    }

    /// Short human-readable description for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Path(p) => format!("file '{}'", p.display()),
            Self::Bytes(b) => format!("{} bytes in memory", b.len()),
            Self::Base64(s) => format!("{} base64 chars", s.len()),
        }
    }

    /// Resolve to raw bytes; unresolvable sources fail as validation errors on `slide`.
    pub(crate) fn read_bytes(&self, slide: usize, what: &str) -> ReelResult<Vec<u8>> {
        let bytes = match self {
            Self::Path(p) => {
                if !p.is_file() {
                    return Err(ReelError::slide_validation(
                        slide,
                        format!("{what} file not found: {}", p.display()),
                    ));
                }
                std::fs::read(p).map_err(|e| {
                    ReelError::slide_validation(
                        slide,
                        format!("failed to read {what} file '{}': {e}", p.display()),
                    )
                })?
            }
            Self::Bytes(b) => b.clone(),
            Self::Base64(s) => base64::engine::general_purpose::STANDARD
                .decode(s.trim())
                .map_err(|e| {
                    ReelError::slide_validation(slide, format!("{what} is not valid base64: {e}"))
                })?,
        };

        if bytes.is_empty() {
            return Err(ReelError::slide_validation(
                slide,
                format!("{what} source is empty"),
            ));
        }
        Ok(bytes)
    }

    /// Return a file path holding this source, writing in-memory data into `dir` when needed.
    pub(crate) fn materialize(
        &self,
        slide: usize,
        what: &str,
        dir: &Path,
        file_name: &str,
    ) -> ReelResult<PathBuf> {
        if let Self::Path(p) = self {
            if !p.is_file() {
                return Err(ReelError::slide_validation(
                    slide,
                    format!("{what} file not found: {}", p.display()),
                ));
            }
            return Ok(p.clone());
        }

        let bytes = self.read_bytes(slide, what)?;
        let path = dir.join(file_name);
        use anyhow::Context as _;
        std::fs::write(&path, bytes)
            .with_context(|| format!("failed to write temporary {what} '{}'", path.display()))?;
        Ok(path)
    }
}

impl From<PathBuf> for MediaSource {
    fn from(p: PathBuf) -> Self {
        Self::Path(p)
    }
}

impl From<&Path> for MediaSource {
    fn from(p: &Path) -> Self {
        Self::Path(p.to_path_buf())
    }
}

impl From<Vec<u8>> for MediaSource {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

/// Audio for one slide: encoded media for ffmpeg to decode, or samples decoded elsewhere.
#[derive(Clone, Debug)]
pub enum AudioSource {
    Encoded(MediaSource),
    Pcm(AudioPcm),
}

impl From<MediaSource> for AudioSource {
    fn from(src: MediaSource) -> Self {
        Self::Encoded(src)
    }
}

impl From<PathBuf> for AudioSource {
    fn from(p: PathBuf) -> Self {
        Self::Encoded(MediaSource::Path(p))
    }
}

impl From<&Path> for AudioSource {
    fn from(p: &Path) -> Self {
        Self::Encoded(MediaSource::Path(p.to_path_buf()))
    }
}

impl From<Vec<u8>> for AudioSource {
    fn from(b: Vec<u8>) -> Self {
        Self::Encoded(MediaSource::Bytes(b))
    }
}

impl From<AudioPcm> for AudioSource {
    fn from(pcm: AudioPcm) -> Self {
        Self::Pcm(pcm)
    }
}

/// One image+audio pair. Position in the input list is the display position.
#[derive(Clone, Debug)]
pub struct Slide {
    pub image: MediaSource,
    pub audio: AudioSource,
    pub title: Option<String>,
}

impl Slide {
    pub fn new(image: impl Into<MediaSource>, audio: impl Into<AudioSource>) -> Self {
        Self {
            image: image.into(),
            audio: audio.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
