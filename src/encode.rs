//! Encoding sinks.
//!
//! Sinks consume cropped frames in stream order and produce the output artifact bytes.

/// `ffmpeg`-based MP4 sink (system `ffmpeg`).
pub mod ffmpeg;
/// Animated GIF sink.
pub mod gif;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
