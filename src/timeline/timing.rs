use crate::foundation::error::{ReelError, ReelResult};

/// Default overlap between consecutive slides, in seconds.
pub const DEFAULT_TRANSITION_SECS: f64 = 0.5;

/// Placement of one slide on the output timeline.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SlideTiming {
    pub index: usize,
    pub start_sec: f64,
    pub duration_sec: f64,
}

impl SlideTiming {
    pub fn end_sec(&self) -> f64 {
        self.start_sec + self.duration_sec
    }
}

/// Per-slide start times and durations derived from audio durations.
///
/// Consecutive slides overlap by `transition_sec`: slide `i` starts `transition_sec` before the
/// audio of slide `i - 1` ends.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    pub transition_sec: f64,
    pub slides: Vec<SlideTiming>,
    pub total_sec: f64,
}

impl Timeline {
    /// Compute the timeline for `audio_durations` (seconds, display order).
    ///
    /// With more than one slide every audio duration must exceed `transition_sec`; shorter clips
    /// would start before their predecessor or get a non-positive display window, so they are
    /// rejected instead of clamped.
    pub fn compute(audio_durations: &[f64], transition_sec: f64) -> ReelResult<Self> {
        if audio_durations.is_empty() {
            return Err(ReelError::EmptyTimeline);
        }
        if !transition_sec.is_finite() || transition_sec < 0.0 {
            return Err(ReelError::validation(format!(
                "transition duration must be finite and >= 0, got {transition_sec}"
            )));
        }

        for (i, &d) in audio_durations.iter().enumerate() {
            if !d.is_finite() || d <= 0.0 {
                return Err(ReelError::slide_validation(
                    i,
                    format!("audio duration must be finite and > 0, got {d}"),
                ));
            }
            if audio_durations.len() > 1 && d <= transition_sec {
                return Err(ReelError::slide_validation(
                    i,
                    format!(
                        "audio duration {d}s does not exceed the {transition_sec}s transition overlap"
                    ),
                ));
            }
        }

        let n = audio_durations.len();
        let mut starts = Vec::with_capacity(n);
        starts.push(0.0f64);
        for i in 1..n {
            starts.push(starts[i - 1] + audio_durations[i - 1] - transition_sec);
        }

        let last = n - 1;
        let total_sec = if n == 1 {
            audio_durations[0]
        } else {
            starts[last] + audio_durations[last]
        };

        let slides = starts
            .iter()
            .enumerate()
            .map(|(i, &start_sec)| SlideTiming {
                index: i,
                start_sec,
                duration_sec: if i == last {
                    total_sec - start_sec
                } else {
                    audio_durations[i]
                },
            })
            .collect();

        Ok(Self {
            transition_sec,
            slides,
            total_sec,
        })
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn start_times(&self) -> Vec<f64> {
        self.slides.iter().map(|s| s.start_sec).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/timing.rs"]
mod tests;
