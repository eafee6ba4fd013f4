use gif::{DisposalMethod, Encoder, Frame, Repeat};
use image::RgbaImage;

use crate::encode::sink::{FrameSink, SinkConfig, check_frame_size};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{WigglegramError, WigglegramResult};

/// NeuQuant sampling speed handed to the `gif` quantiser (1 = best, 30 = fastest).
const QUANTIZE_SPEED: i32 = 10;

/// Options for [`GifSink`].
#[derive(Clone, Copy, Debug)]
pub struct GifSinkOpts {
    /// Loop behaviour written to the NETSCAPE extension.
    pub repeat: Repeat,
}

impl Default for GifSinkOpts {
    fn default() -> Self {
        Self {
            repeat: Repeat::Infinite,
        }
    }
}

/// Sink that encodes an animated GIF into memory.
///
/// The per-frame delay is derived from the configured fps, rounded to GIF's centisecond grid.
pub struct GifSink {
    opts: GifSinkOpts,
    encoder: Option<Encoder<Vec<u8>>>,
    cfg: Option<SinkConfig>,
    delay_cs: u16,
    bytes: Option<Vec<u8>>,
}

impl GifSink {
    /// Create a GIF sink.
    pub fn new(opts: GifSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            cfg: None,
            delay_cs: 0,
            bytes: None,
        }
    }

    /// Finished GIF file contents; `None` until `end` succeeded.
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        self.bytes
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> WigglegramResult<()> {
        if cfg.size.is_empty() {
            return Err(WigglegramError::validation(
                "gif sink width/height must be non-zero",
            ));
        }
        let width = u16::try_from(cfg.size.width)
            .map_err(|_| WigglegramError::validation("gif width exceeds 65535"))?;
        let height = u16::try_from(cfg.size.height)
            .map_err(|_| WigglegramError::validation("gif height exceeds 65535"))?;

        let mut encoder = Encoder::new(Vec::new(), width, height, &[])
            .map_err(|e| WigglegramError::encode(format!("create gif encoder: {e}")))?;
        encoder
            .set_repeat(self.opts.repeat)
            .map_err(|e| WigglegramError::encode(format!("set gif repeat: {e}")))?;

        self.delay_cs = frame_delay_centis(cfg.fps);
        self.encoder = Some(encoder);
        self.cfg = Some(cfg);
        self.bytes = None;
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, frame: &RgbaImage) -> WigglegramResult<()> {
        let (Some(cfg), Some(encoder)) = (self.cfg, self.encoder.as_mut()) else {
            return Err(WigglegramError::encode("gif sink is not started"));
        };
        check_frame_size(cfg.size, frame)?;

        let mut pixels = frame.as_raw().clone();
        // Dimensions were range-checked in `begin`.
        let mut gif_frame = Frame::from_rgba_speed(
            cfg.size.width as u16,
            cfg.size.height as u16,
            &mut pixels,
            QUANTIZE_SPEED,
        );
        gif_frame.delay = self.delay_cs;
        // Transparent pixels must show the background, not the previous half-frame.
        gif_frame.dispose = DisposalMethod::Background;

        encoder
            .write_frame(&gif_frame)
            .map_err(|e| WigglegramError::encode(format!("write gif frame: {e}")))
    }

    fn end(&mut self) -> WigglegramResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| WigglegramError::encode("gif sink is already finalized"))?;
        let bytes = encoder
            .into_inner()
            .map_err(|e| WigglegramError::encode(format!("finish gif: {e}")))?;
        tracing::debug!(bytes = bytes.len(), delay_cs = self.delay_cs, "gif finished");
        self.bytes = Some(bytes);
        Ok(())
    }
}

/// Frame delay in hundredths of a second for `fps`, at least 1.
pub fn frame_delay_centis(fps: Fps) -> u16 {
    let cs = (u64::from(fps.den) * 100 + u64::from(fps.num) / 2) / u64::from(fps.num);
    cs.clamp(1, u64::from(u16::MAX)) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
