//! Request-level entry point: four uploads in, one artifact out.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use sha2::Digest as _;

use crate::{
    assets::{NamedImage, decode::decode_image, input::InputImage},
    crop::{FrameSequence, crop_to_common_size},
    encode::{
        ffmpeg::{FfmpegSink, FfmpegSinkOpts},
        gif::{GifSink, GifSinkOpts},
    },
    foundation::{
        core::{FRAME_COUNT, Size},
        error::{WigglegramError, WigglegramResult},
    },
    order::{InputOrder, sort_by_trailing_number},
    sequence::{GifSpec, VideoDuration, VideoPlan, VideoPolicy, render_gif, render_video},
};

/// Default artifact file stem.
pub const DEFAULT_STEM: &str = "wigglegram";

/// Kind of artifact to produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Looping animated GIF.
    #[default]
    Gif,
    /// H.264 MP4 clip (requires `ffmpeg` on PATH).
    Mp4,
}

impl OutputFormat {
    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Gif => "gif",
            Self::Mp4 => "mp4",
        }
    }

    /// MIME type of the artifact.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Gif => "image/gif",
            Self::Mp4 => "video/mp4",
        }
    }
}

/// Everything one pipeline run needs. The pipeline keeps no state between runs.
#[derive(Clone, Debug)]
pub struct Request {
    /// Uploaded images; exactly [`FRAME_COUNT`] are required.
    pub inputs: Vec<InputImage>,
    /// Artifact kind.
    pub format: OutputFormat,
    /// Clip length; only used for [`OutputFormat::Mp4`].
    pub duration: VideoDuration,
    /// Ordering applied before cropping.
    pub order: InputOrder,
    /// Video length strategy; only used for [`OutputFormat::Mp4`].
    pub policy: VideoPolicy,
    /// Artifact file name without extension.
    pub stem: String,
}

impl Request {
    /// A GIF request with default settings.
    pub fn new(inputs: Vec<InputImage>) -> Self {
        Self {
            inputs,
            format: OutputFormat::Gif,
            duration: VideoDuration::default(),
            order: InputOrder::default(),
            policy: VideoPolicy::default(),
            stem: DEFAULT_STEM.to_string(),
        }
    }
}

/// The encoded output, held in memory.
#[derive(Clone, PartialEq)]
pub struct Artifact {
    /// Artifact kind.
    pub format: OutputFormat,
    /// Suggested download name, `<stem>.<ext>`.
    pub file_name: String,
    /// Frame size in the encoded file.
    pub size: Size,
    /// Number of frames in the encoded file.
    pub frame_count: usize,
    /// Playback length in seconds.
    pub duration_secs: f64,
    /// Names of the inputs in the order they were animated.
    pub frame_names: Vec<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// MIME type.
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    /// Write the artifact into `dir` under its file name.
    pub fn write_to_dir(&self, dir: &Path) -> WigglegramResult<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)
            .with_context(|| format!("write artifact '{}'", path.display()))?;
        Ok(path)
    }

    /// Serializable metadata, including a SHA-256 of the bytes.
    pub fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            file_name: self.file_name.clone(),
            mime: self.mime(),
            format: self.format,
            width: self.size.width,
            height: self.size.height,
            frame_count: self.frame_count,
            duration_secs: self.duration_secs,
            frame_names: self.frame_names.clone(),
            byte_len: self.bytes.len(),
            sha256: sha256_hex(&self.bytes),
        }
    }
}

impl std::fmt::Debug for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifact")
            .field("format", &self.format)
            .field("file_name", &self.file_name)
            .field("size", &self.size)
            .field("frame_count", &self.frame_count)
            .field("duration_secs", &self.duration_secs)
            .field("frame_names", &self.frame_names)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Artifact metadata as printed by `wigglegram --json`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ArtifactSummary {
    /// Suggested download name.
    pub file_name: String,
    /// MIME type.
    pub mime: &'static str,
    /// Artifact kind.
    pub format: OutputFormat,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Number of encoded frames.
    pub frame_count: usize,
    /// Playback length in seconds (one loop for GIFs).
    pub duration_secs: f64,
    /// Input names in animation order.
    pub frame_names: Vec<String>,
    /// Size of the file in bytes.
    pub byte_len: usize,
    /// Lowercase hex SHA-256 of the file.
    pub sha256: String,
}

/// Run the whole pipeline: validate, decode, order, crop, sequence, encode.
///
/// The input count is checked before any image is decoded.
#[tracing::instrument(skip(req), fields(inputs = req.inputs.len(), format = ?req.format))]
pub fn run(req: &Request) -> WigglegramResult<Artifact> {
    if req.inputs.len() != FRAME_COUNT {
        return Err(WigglegramError::input_count(FRAME_COUNT, req.inputs.len()));
    }
    if req.stem.is_empty() || req.stem.contains(['/', '\\']) {
        return Err(WigglegramError::validation(format!(
            "artifact stem '{}' must be a plain, non-empty file name",
            req.stem
        )));
    }

    let mut images = req
        .inputs
        .iter()
        .map(|input| decode_image(&input.name, &input.bytes))
        .collect::<WigglegramResult<Vec<NamedImage>>>()?;

    if req.order == InputOrder::TrailingNumber {
        sort_by_trailing_number(&mut images, |img| img.name.as_str());
    }
    let frame_names: Vec<String> = images.iter().map(|img| img.name.clone()).collect();

    let seq = FrameSequence::new(crop_to_common_size(&images)?)?;
    tracing::info!(size = %seq.size(), order = ?frame_names, "cropped frames");

    let file_name = format!("{}.{}", req.stem, req.format.extension());
    let artifact = match req.format {
        OutputFormat::Gif => {
            let spec = GifSpec::default();
            let mut sink = GifSink::new(GifSinkOpts::default());
            render_gif(&seq, spec, &mut sink)?;
            let bytes = sink
                .into_bytes()
                .ok_or_else(|| WigglegramError::encode("gif sink produced no output"))?;
            Artifact {
                format: req.format,
                file_name,
                size: seq.size(),
                frame_count: seq.len(),
                duration_secs: spec.fps()?.frames_to_secs(seq.len() as u64),
                frame_names,
                bytes,
            }
        }
        OutputFormat::Mp4 => {
            let plan = VideoPlan::new(req.policy, seq.len(), req.duration)?;
            tracing::info!(
                policy = ?req.policy,
                fps = plan.fps.as_f64(),
                frames = plan.frames.len(),
                "planned video"
            );
            let mut sink = FfmpegSink::new(FfmpegSinkOpts::default());
            render_video(&seq, &plan, &mut sink)?;
            let size = sink.output_size().unwrap_or_else(|| seq.size());
            let bytes = sink
                .into_bytes()
                .ok_or_else(|| WigglegramError::encode("ffmpeg sink produced no output"))?;
            Artifact {
                format: req.format,
                file_name,
                size,
                frame_count: plan.frames.len(),
                duration_secs: plan.duration_secs(),
                frame_names,
                bytes,
            }
        }
    };

    tracing::info!(
        file = %artifact.file_name,
        bytes = artifact.bytes.len(),
        frames = artifact.frame_count,
        "artifact ready"
    );
    Ok(artifact)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
