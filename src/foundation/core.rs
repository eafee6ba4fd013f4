use crate::foundation::error::{WigglegramError, WigglegramResult};

/// Number of half-frames a wigglegram is built from.
pub const FRAME_COUNT: usize = 4;

/// Display time of each GIF frame, in milliseconds.
pub const GIF_FRAME_DELAY_MS: u32 = 300;

/// Fixed playback rate used by frame-repetition video output.
pub const VIDEO_FPS: u32 = 10;

/// Shortest accepted video duration in seconds.
pub const MIN_VIDEO_SECS: u32 = 1;

/// Longest accepted video duration in seconds.
pub const MAX_VIDEO_SECS: u32 = 30;

/// Video duration used when none is requested.
pub const DEFAULT_VIDEO_SECS: u32 = 10;

/// 0-based position of a frame within an encoded stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> WigglegramResult<Self> {
        if den == 0 {
            return Err(WigglegramError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(WigglegramError::validation("Fps num must be > 0"));
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

    /// Convert frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Rate at which each frame stays on screen for `delay_ms` milliseconds.
    pub fn from_frame_delay_ms(delay_ms: u32) -> WigglegramResult<Self> {
        Self::new(1000, delay_ms)
    }
}

/// Pixel dimensions of an image or frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Element-wise minimum of two sizes.
    pub fn min(self, other: Self) -> Self {
        Self {
            width: self.width.min(other.width),
            height: self.height.min(other.height),
        }
    }

    /// Return `true` when either axis is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Largest size with even dimensions that fits inside `self`.
    pub fn even(self) -> Self {
        Self {
            width: self.width & !1,
            height: self.height & !1,
        }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
