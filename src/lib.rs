//! Wigglegram assembles four half-frame photographs from a multi-lens stereo camera into a
//! looping animation.
//!
//! The pipeline is a single synchronous pass:
//!
//! - Decode the uploads ([`decode_image`])
//! - Optionally order them by the number ending each file name ([`sort_by_trailing_number`])
//! - Center-crop them to their common size ([`crop_to_common_size`])
//! - Stream the frames into a [`FrameSink`] as a looping GIF or an MP4 of a requested length
//!
//! [`run`] wires these together for one [`Request`] and returns an in-memory [`Artifact`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Image loading.
pub mod assets;
/// Center-cropping to a common size.
pub mod crop;
/// Encoding sinks.
pub mod encode;
/// Ordering by trailing frame number.
pub mod order;
/// Request-level entry point.
pub mod pipeline;
/// Frame stream planning for GIF and video output.
pub mod sequence;

pub use crate::foundation::core::{
    DEFAULT_VIDEO_SECS, FRAME_COUNT, Fps, FrameIndex, GIF_FRAME_DELAY_MS, MAX_VIDEO_SECS,
    MIN_VIDEO_SECS, Size, VIDEO_FPS,
};
pub use crate::foundation::error::{WigglegramError, WigglegramResult};

pub use crate::assets::NamedImage;
pub use crate::assets::decode::decode_image;
pub use crate::assets::input::InputImage;
pub use crate::crop::{FrameSequence, center_crop, common_size, crop_to_common_size};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::gif::{GifSink, GifSinkOpts};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::order::{InputOrder, SuffixKey, sort_by_trailing_number, trailing_number};
pub use crate::pipeline::{Artifact, ArtifactSummary, DEFAULT_STEM, OutputFormat, Request, run};
pub use crate::sequence::{GifSpec, VideoDuration, VideoPlan, VideoPolicy, render_gif, render_video};
