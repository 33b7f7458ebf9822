use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::assets::source::{MediaSource, Slide};
use crate::foundation::error::{ReelError, ReelResult};

/// On-disk slide list.
///
/// ```json
/// {"headline": "Optional", "slides": [{"image": "a.png", "audio": {"base64": "..."}, "title": "A"}]}
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlideManifest {
    #[serde(default)]
    pub headline: Option<String>,
    pub slides: Vec<SlideEntry>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlideEntry {
    pub image: SourceRef,
    pub audio: SourceRef,
    #[serde(default)]
    pub title: Option<String>,
}

/// A path (relative paths resolve against the manifest directory) or inline base64 bytes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum SourceRef {
    Path(String),
    Inline { base64: String },
}

impl SourceRef {
    fn resolve(&self, base_dir: &Path) -> MediaSource {
        match self {
            Self::Path(p) => {
                let p = PathBuf::from(p);
                if p.is_absolute() {
                    MediaSource::Path(p)
                } else {
                    MediaSource::Path(base_dir.join(p))
                }
            }
            Self::Inline { base64 } => MediaSource::Base64(base64.clone()),
        }
    }
}

impl SlideManifest {
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let manifest: Self = serde_json::from_str(s)
            .map_err(|e| ReelError::validation(format!("invalid slide manifest: {e}")))?;
        if manifest.slides.is_empty() {
            return Err(ReelError::EmptyTimeline);
        }
        Ok(manifest)
    }

    /// Turn entries into [`Slide`]s, resolving relative paths against `base_dir`.
    pub fn to_slides(&self, base_dir: &Path) -> Vec<Slide> {
        self.slides
            .iter()
            .map(|e| Slide {
                image: e.image.resolve(base_dir),
                audio: e.audio.resolve(base_dir).into(),
                title: e.title.clone(),
            })
            .collect()
    }
}

/// Read a manifest file; its directory becomes the base for relative paths.
pub fn load_manifest(path: &Path) -> ReelResult<(SlideManifest, Vec<Slide>)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read slide manifest '{}'", path.display()))?;
    let manifest = SlideManifest::from_json_str(&text)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let slides = manifest.to_slides(base_dir);
    tracing::debug!(path = %path.display(), slides = slides.len(), "loaded slide manifest");
    Ok((manifest, slides))
}

#[cfg(test)]
#[path = "../tests/unit/manifest.rs"]
mod tests;
