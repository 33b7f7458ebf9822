use std::path::PathBuf;

use crate::foundation::core::{Canvas, Fps, Resolution};
use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::timing::DEFAULT_TRANSITION_SECS;

/// Per-call assembly settings. Nothing here outlives one [`crate::assemble`] call.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AssembleConfig {
    pub resolution: Resolution,
    /// Final MP4 path (used by [`crate::assemble_to_mp4`]).
    pub out_path: PathBuf,
    /// Overlap between consecutive slides, in seconds.
    pub transition_sec: f64,
    pub fps: Fps,
    /// Straight-alpha RGBA background behind the slides.
    pub background_rgba: [u8; 4],
    pub overwrite: bool,
    /// Container `title` metadata.
    pub title: Option<String>,
}

impl Default for AssembleConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::Full,
            out_path: PathBuf::from("output.mp4"),
            transition_sec: DEFAULT_TRANSITION_SECS,
            fps: Fps::default(),
            background_rgba: [0, 0, 0, 255],
            overwrite: true,
            title: None,
        }
    }
}

impl AssembleConfig {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            ..Self::default()
        }
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_transition_sec(mut self, transition_sec: f64) -> Self {
        self.transition_sec = transition_sec;
        self
    }

    pub fn with_fps(mut self, fps: Fps) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn canvas(&self) -> Canvas {
        self.resolution.canvas()
    }

    pub fn validate(&self) -> ReelResult<()> {
        self.canvas().validate()?;
        Fps::new(self.fps.num, self.fps.den)?;
        if !self.transition_sec.is_finite() || self.transition_sec < 0.0 {
            return Err(ReelError::validation(format!(
                "transition duration must be finite and >= 0, got {}",
                self.transition_sec
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
