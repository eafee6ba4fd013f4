//! Turning a [`FrameSequence`] into an ordered frame stream for a sink.
//!
//! The GIF path shows each frame once per loop at a fixed delay. The video path needs a clip of a
//! requested length from only four frames, which is solved by one of two [`VideoPolicy`]s.

use crate::{
    crop::FrameSequence,
    encode::sink::{FrameSink, SinkConfig},
    foundation::{
        core::{
            DEFAULT_VIDEO_SECS, Fps, FrameIndex, GIF_FRAME_DELAY_MS, MAX_VIDEO_SECS,
            MIN_VIDEO_SECS, VIDEO_FPS,
        },
        error::{WigglegramError, WigglegramResult},
    },
};

/// Timing of the looping animated image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GifSpec {
    /// Display time of each frame in milliseconds.
    pub frame_delay_ms: u32,
}

impl Default for GifSpec {
    fn default() -> Self {
        Self {
            frame_delay_ms: GIF_FRAME_DELAY_MS,
        }
    }
}

impl GifSpec {
    /// Playback rate equivalent to the frame delay.
    pub fn fps(self) -> WigglegramResult<Fps> {
        Fps::from_frame_delay_ms(self.frame_delay_ms)
    }
}

/// Requested video length, validated to `MIN_VIDEO_SECS..=MAX_VIDEO_SECS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct VideoDuration(u32);

impl VideoDuration {
    /// Validate a duration in whole seconds.
    pub fn from_secs(secs: u32) -> WigglegramResult<Self> {
        if !(MIN_VIDEO_SECS..=MAX_VIDEO_SECS).contains(&secs) {
            return Err(WigglegramError::validation(format!(
                "video duration must be {MIN_VIDEO_SECS}..={MAX_VIDEO_SECS} seconds, got {secs}"
            )));
        }
        Ok(Self(secs))
    }

    /// Duration in seconds.
    pub fn secs(self) -> u32 {
        self.0
    }
}

impl Default for VideoDuration {
    fn default() -> Self {
        Self(DEFAULT_VIDEO_SECS)
    }
}

/// How a four-frame sequence is stretched to the requested video length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VideoPolicy {
    /// Encode each frame once at `frames / seconds` fps.
    ///
    /// Exact length, but short durations give implausibly high rates and long ones a slideshow.
    RateScaling,
    /// Encode at a fixed [`VIDEO_FPS`], cycling the frames until the length is filled.
    #[default]
    FrameRepetition,
}

/// Encode order and rate for a video.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoPlan {
    /// Output playback rate.
    pub fps: Fps,
    /// Indices into the frame sequence, in encode order.
    pub frames: Vec<usize>,
}

impl VideoPlan {
    /// Build the plan for `policy`.
    pub fn new(
        policy: VideoPolicy,
        frame_count: usize,
        duration: VideoDuration,
    ) -> WigglegramResult<Self> {
        match policy {
            VideoPolicy::RateScaling => plan_rate_scaling(frame_count, duration),
            VideoPolicy::FrameRepetition => plan_frame_repetition(frame_count, duration, VIDEO_FPS),
        }
    }

    /// Playback length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.frames.len() as u64)
    }
}

/// Every frame once, at `frame_count / secs` fps.
pub fn plan_rate_scaling(
    frame_count: usize,
    duration: VideoDuration,
) -> WigglegramResult<VideoPlan> {
    let num = u32::try_from(frame_count)
        .map_err(|_| WigglegramError::validation("too many frames for rate scaling"))?;
    let fps = Fps::new(num, duration.secs())?;
    Ok(VideoPlan {
        fps,
        frames: (0..frame_count).collect(),
    })
}

/// `rate * secs` frames at a fixed rate: the cycle repeated `ceil(needed / frame_count)` times,
/// then truncated to exactly `needed`.
pub fn plan_frame_repetition(
    frame_count: usize,
    duration: VideoDuration,
    rate: u32,
) -> WigglegramResult<VideoPlan> {
    if frame_count == 0 {
        return Err(WigglegramError::validation(
            "frame repetition needs at least one frame",
        ));
    }
    let fps = Fps::new(rate, 1)?;
    let needed = rate as usize * duration.secs() as usize;
    let cycles = needed.div_ceil(frame_count);

    let mut frames: Vec<usize> = std::iter::repeat_n(0..frame_count, cycles)
        .flatten()
        .collect();
    frames.truncate(needed);
    Ok(VideoPlan { fps, frames })
}

/// Push every frame once, in order, at the GIF rate.
pub fn render_gif(
    seq: &FrameSequence,
    spec: GifSpec,
    sink: &mut dyn FrameSink,
) -> WigglegramResult<()> {
    let fps = spec.fps()?;
    sink.begin(SinkConfig {
        size: seq.size(),
        fps,
    })?;
    for (i, frame) in seq.frames().iter().enumerate() {
        sink.push_frame(FrameIndex(i as u64), frame)?;
    }
    sink.end()
}

/// Push the frames named by `plan`, in plan order.
pub fn render_video(
    seq: &FrameSequence,
    plan: &VideoPlan,
    sink: &mut dyn FrameSink,
) -> WigglegramResult<()> {
    sink.begin(SinkConfig {
        size: seq.size(),
        fps: plan.fps,
    })?;
    for (i, &src) in plan.frames.iter().enumerate() {
        let frame = seq.get(src).ok_or_else(|| {
            WigglegramError::validation(format!(
                "plan references frame {src}, sequence has {}",
                seq.len()
            ))
        })?;
        sink.push_frame(FrameIndex(i as u64), frame)?;
    }
    sink.end()
}

#[cfg(test)]
#[path = "../tests/unit/sequence.rs"]
mod tests;
