use crate::foundation::core::{Canvas, Point};

/// How a slide moves during its display window.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Motion {
    /// Held at the canvas center for the whole window.
    Centered,
    /// Enters from beyond the right edge and reaches center after `transition_sec`.
    SlideInFromRight { transition_sec: f64 },
}

/// Position function of one image track.
///
/// Pure: the top-left corner depends only on the placement and the track-local time.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    pub canvas: Canvas,
    pub width: u32,
    pub height: u32,
    pub motion: Motion,
}

impl Placement {
    pub fn new(canvas: Canvas, width: u32, height: u32, motion: Motion) -> Self {
        Self {
            canvas,
            width,
            height,
            motion,
        }
    }

    /// Full-canvas placement, used for the background.
    pub fn fill(canvas: Canvas) -> Self {
        Self::new(canvas, canvas.width, canvas.height, Motion::Centered)
    }

    pub fn center_x(&self) -> f64 {
        center_offset(self.canvas.width, self.width)
    }

    pub fn center_y(&self) -> f64 {
        center_offset(self.canvas.height, self.height)
    }

    /// Top-left corner at `local_sec` seconds after the track start.
    pub fn position(&self, local_sec: f64) -> Point {
        let x = match self.motion {
            Motion::Centered => self.center_x(),
            Motion::SlideInFromRight { transition_sec } => slide_in_x(
                local_sec,
                transition_sec,
                f64::from(self.canvas.width),
                self.center_x(),
            ),
        };
        Point::new(x, self.center_y())
    }
}

/// Offset that centers `inner` within `outer` (negative when `inner` is larger).
pub fn center_offset(outer: u32, inner: u32) -> f64 {
    (f64::from(outer) - f64::from(inner)) / 2.0
}

/// Linear slide from `canvas_width` (fully off-screen right) to `center_x` over `transition_sec`.
pub fn slide_in_x(local_sec: f64, transition_sec: f64, canvas_width: f64, center_x: f64) -> f64 {
    if local_sec >= transition_sec {
        return center_x;
    }
    let progress = (local_sec / transition_sec).max(0.0);
    canvas_width - progress * (canvas_width - center_x)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/transition.rs"]
mod tests;
