use std::io::{Read as _, Write as _};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};

use anyhow::Context as _;
use image::RgbaImage;

use crate::crop::center_crop;
use crate::encode::sink::{FrameSink, SinkConfig, check_frame_size};
use crate::foundation::core::{Fps, FrameIndex, Size};
use crate::foundation::error::{WigglegramError, WigglegramResult};

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FfmpegSinkOpts {
    /// Background color used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
}

impl Default for FfmpegSinkOpts {
    fn default() -> Self {
        Self {
            bg_rgba: [0, 0, 0, 255],
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw frames to stdin.
///
/// The MP4 is written into a private temporary directory and read back into memory on `end`;
/// the directory is removed when the sink is dropped.
///
/// H.264 in yuv420p needs even dimensions, so odd-sized frames lose their last row or column
/// through a centered one-pixel trim.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    workdir: Option<tempfile::TempDir>,
    out_path: Option<PathBuf>,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    out_size: Option<Size>,
    last_idx: Option<FrameIndex>,
    bytes: Option<Vec<u8>>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            workdir: None,
            out_path: None,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            out_size: None,
            last_idx: None,
            bytes: None,
        }
    }

    /// Size actually encoded, known after `begin`.
    pub fn output_size(&self) -> Option<Size> {
        self.out_size
    }

    /// Finished MP4 file contents; `None` until `end` succeeded.
    pub fn into_bytes(mut self) -> Option<Vec<u8>> {
        self.bytes.take()
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> WigglegramResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(WigglegramError::validation("fps must be non-zero"));
        }
        let out_size = cfg.size.even();
        if out_size.is_empty() {
            return Err(WigglegramError::validation(format!(
                "frames of {} are too small for yuv420p mp4 output",
                cfg.size
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(WigglegramError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let workdir = tempfile::Builder::new()
            .prefix("wigglegram-")
            .tempdir()
            .context("create ffmpeg work directory")?;
        let out_path = workdir.path().join("out.mp4");

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        // Input: raw straight-alpha RGBA8, flattened to opaque in push_frame.
        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &out_size.to_string(),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args([
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(&out_path);

        let mut child = cmd.spawn().map_err(|e| {
            WigglegramError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| WigglegramError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| WigglegramError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(
            size = %out_size,
            fps = cfg.fps.as_f64(),
            path = %out_path.display(),
            "spawned ffmpeg"
        );

        self.scratch = vec![0u8; out_size.width as usize * out_size.height as usize * 4];
        self.workdir = Some(workdir);
        self.out_path = Some(out_path);
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.out_size = Some(out_size);
        self.last_idx = None;
        self.bytes = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbaImage) -> WigglegramResult<()> {
        let (Some(cfg), Some(out_size)) = (self.cfg, self.out_size) else {
            return Err(WigglegramError::encode("ffmpeg sink not started"));
        };
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(WigglegramError::encode(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);
        check_frame_size(cfg.size, frame)?;

        fill_opaque_frame(&mut self.scratch, frame, out_size, self.opts.bg_rgba)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(WigglegramError::encode("ffmpeg sink is already finalized"));
        };
        stdin.write_all(&self.scratch).map_err(|e| {
            WigglegramError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> WigglegramResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| WigglegramError::encode("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            WigglegramError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| WigglegramError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| WigglegramError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(WigglegramError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        let out_path = self
            .out_path
            .take()
            .ok_or_else(|| WigglegramError::encode("ffmpeg output path missing (unexpected)"))?;
        let bytes = std::fs::read(&out_path)
            .with_context(|| format!("read ffmpeg output '{}'", out_path.display()))?;
        tracing::debug!(bytes = bytes.len(), "mp4 finished");

        self.bytes = Some(bytes);
        self.workdir = None;
        self.cfg = None;
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        // An unfinished encode must not leave ffmpeg running against a deleted directory.
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Return `true` when a runnable `ffmpeg` binary is on PATH.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Center-trim `frame` to `out_size` when needed and flatten it into `dst` as opaque RGBA8.
fn fill_opaque_frame(
    dst: &mut [u8],
    frame: &RgbaImage,
    out_size: Size,
    bg_rgba: [u8; 4],
) -> WigglegramResult<()> {
    if frame.dimensions() == (out_size.width, out_size.height) {
        return flatten_straight_over_bg_to_opaque_rgba8(dst, frame.as_raw(), bg_rgba);
    }
    let trimmed = center_crop(frame, out_size)?;
    flatten_straight_over_bg_to_opaque_rgba8(dst, trimmed.as_raw(), bg_rgba)
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // For rawvideo input, `-r` before `-i` sets the input framerate; `num/den` keeps it exact.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

fn flatten_straight_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    bg_rgba: [u8; 4],
) -> WigglegramResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(WigglegramError::validation(
            "flatten_straight_over_bg_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = u16::from(bg_rgba[0]);
    let bg_g = u16::from(bg_rgba[1]);
    let bg_b = u16::from(bg_rgba[2]);

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255 - a;
        d[0] = (mul_div255(u16::from(s[0]), a) + mul_div255(bg_r, inv)).min(255) as u8;
        d[1] = (mul_div255(u16::from(s[1]), a) + mul_div255(bg_g, inv)).min(255) as u8;
        d[2] = (mul_div255(u16::from(s[2]), a) + mul_div255(bg_b, inv)).min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    ((u32::from(x) * u32::from(y) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
