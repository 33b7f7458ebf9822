pub type ReelResult<T> = Result<T, ReelError>;

#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Malformed or missing input. `slide` names the offending slide when there is one.
    #[error("validation error: {message}")]
    Validation {
        slide: Option<usize>,
        message: String,
    },

    #[error("empty timeline: at least one slide is required")]
    EmptyTimeline,

    #[error("media decode error: slide {slide}: {message}")]
    MediaDecode { slide: usize, message: String },

    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            slide: None,
            message: msg.into(),
        }
    }

    pub fn slide_validation(slide: usize, msg: impl AsRef<str>) -> Self {
        Self::Validation {
            slide: Some(slide),
            message: format!("slide {slide}: {}", msg.as_ref()),
        }
    }

    pub fn media_decode(slide: usize, msg: impl Into<String>) -> Self {
        Self::MediaDecode {
            slide,
            message: msg.into(),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Index of the slide this error is about, if any.
    pub fn slide(&self) -> Option<usize> {
        match self {
            Self::Validation { slide, .. } => *slide,
            Self::MediaDecode { slide, .. } => Some(*slide),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
