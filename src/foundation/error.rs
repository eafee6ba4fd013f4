/// Result alias used throughout the crate.
pub type WigglegramResult<T> = Result<T, WigglegramError>;

/// Errors produced by the wigglegram pipeline.
///
/// Every error is fatal to the request that raised it.
#[derive(thiserror::Error, Debug)]
pub enum WigglegramError {
    /// The request did not carry the required number of images.
    #[error("invalid input count: expected {expected} images, got {got}")]
    InvalidInputCount {
        /// Required number of images.
        expected: usize,
        /// Number of images actually supplied.
        got: usize,
    },

    /// Image bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Image bytes are a format other than JPEG or PNG.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A parameter or intermediate value is out of range.
    #[error("validation error: {0}")]
    Validation(String),

    /// The GIF or ffmpeg encoder failed.
    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    /// Any other failure, usually an I/O error with attached context.
    Other(#[from] anyhow::Error),
}

impl WigglegramError {
    /// Build an [`WigglegramError::InvalidInputCount`].
    pub fn input_count(expected: usize, got: usize) -> Self {
        Self::InvalidInputCount { expected, got }
    }

    /// Build a [`WigglegramError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`WigglegramError::UnsupportedFormat`].
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Build a [`WigglegramError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WigglegramError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
