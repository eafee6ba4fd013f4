use image::RgbaImage;

use crate::foundation::core::{Fps, FrameIndex, Size};
use crate::foundation::error::{WigglegramError, WigglegramResult};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinkConfig {
    /// Frame size in pixels; every pushed frame must match.
    pub size: Size,
    /// Playback rate of the output stream.
    pub fps: Fps,
}

/// Sink contract for consuming frames in stream order.
///
/// `push_frame` is called with strictly increasing [`FrameIndex`] values starting at 0.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> WigglegramResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbaImage) -> WigglegramResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> WigglegramResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, RgbaImage)>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, RgbaImage)] {
        &self.frames
    }

    /// Whether `end` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> WigglegramResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbaImage) -> WigglegramResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| WigglegramError::validation("push_frame before begin"))?;
        check_frame_size(cfg.size, frame)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> WigglegramResult<()> {
        self.finished = true;
        Ok(())
    }
}

pub(crate) fn check_frame_size(expected: Size, frame: &RgbaImage) -> WigglegramResult<()> {
    let (w, h) = frame.dimensions();
    if w != expected.width || h != expected.height {
        return Err(WigglegramError::validation(format!(
            "frame size mismatch: got {w}x{h}, expected {expected}"
        )));
    }
    Ok(())
}
