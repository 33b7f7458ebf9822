use crate::foundation::error::{ReelError, ReelResult};

pub use kurbo::Point;

/// Absolute 0-based frame index in output timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> ReelResult<Self> {
        if den == 0 {
            return Err(ReelError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ReelError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Timeline time (seconds) at which frame `idx` is sampled.
    pub fn frame_to_secs(self, idx: FrameIndex) -> f64 {
        (idx.0 as f64) * self.frame_duration_secs()
    }

    /// Number of frames needed to cover `secs`, rounded to the nearest frame and at least one.
    pub fn frames_for_secs(self, secs: f64) -> u64 {
        ((secs * self.as_f64()).round().max(1.0)) as u64
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Byte length of one tightly packed RGBA8 frame, computed in `usize`.
    pub fn rgba_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    pub fn validate(self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::validation("canvas width/height must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(ReelError::validation(
                "canvas width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        Ok(())
    }
}

/// Output resolution, chosen per call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Low-resolution portrait output for quick checks.
    Preview,
    /// Final-quality portrait output.
    #[default]
    Full,
    Custom {
        width: u32,
        height: u32,
    },
}

impl Resolution {
    pub const PREVIEW: Canvas = Canvas {
        width: 360,
        height: 640,
    };
    pub const FULL: Canvas = Canvas {
        width: 1080,
        height: 1920,
    };

    pub fn canvas(self) -> Canvas {
        match self {
            Self::Preview => Self::PREVIEW,
            Self::Full => Self::FULL,
            Self::Custom { width, height } => Canvas { width, height },
        }
    }
}

/// Straight-alpha RGBA8 to premultiplied RGBA8.
pub fn premultiply_rgba(rgba: [u8; 4]) -> [u8; 4] {
    fn premul(c: u8, a: u8) -> u8 {
        let c = u16::from(c);
        let a = u16::from(a);
        (((c * a) + 127) / 255) as u8
    }

    let a = rgba[3];
    [premul(rgba[0], a), premul(rgba[1], a), premul(rgba[2], a), a]
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
