//! Center-cropping of half-frames to their common size.

use image::{RgbaImage, imageops};

use crate::{
    assets::NamedImage,
    foundation::{
        core::{FRAME_COUNT, Size},
        error::{WigglegramError, WigglegramResult},
    },
};

/// Element-wise minimum of `sizes`, or `None` when empty.
pub fn common_size(sizes: &[Size]) -> Option<Size> {
    sizes.iter().copied().reduce(Size::min)
}

/// Offset of a centered span of length `target` inside `src`: `floor((src - target) / 2)`.
pub fn crop_offset(src: u32, target: u32) -> u32 {
    src.saturating_sub(target) / 2
}

/// Copy the centered `target`-sized rectangle out of `img`. No resampling.
pub fn center_crop(img: &RgbaImage, target: Size) -> WigglegramResult<RgbaImage> {
    let (width, height) = img.dimensions();
    if target.width > width || target.height > height {
        return Err(WigglegramError::validation(format!(
            "crop target {target} exceeds source {width}x{height}"
        )));
    }
    if target.width == width && target.height == height {
        return Ok(img.clone());
    }

    let x = crop_offset(width, target.width);
    let y = crop_offset(height, target.height);
    Ok(imageops::crop_imm(img, x, y, target.width, target.height).to_image())
}

/// Crop every image to the smallest width and height found among them.
pub fn crop_to_common_size(images: &[NamedImage]) -> WigglegramResult<Vec<RgbaImage>> {
    let sizes: Vec<Size> = images.iter().map(NamedImage::size).collect();
    let target = common_size(&sizes)
        .ok_or_else(|| WigglegramError::validation("cannot crop an empty image set"))?;
    if target.is_empty() {
        return Err(WigglegramError::validation(format!(
            "common crop size {target} is empty"
        )));
    }

    tracing::debug!(%target, "cropping to common size");
    images
        .iter()
        .map(|named| center_crop(&named.image, target))
        .collect()
}

/// Exactly [`FRAME_COUNT`] equally sized frames, in animation order.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSequence {
    frames: Vec<RgbaImage>,
    size: Size,
}

impl FrameSequence {
    /// Validate frame count and uniform size.
    pub fn new(frames: Vec<RgbaImage>) -> WigglegramResult<Self> {
        if frames.len() != FRAME_COUNT {
            return Err(WigglegramError::input_count(FRAME_COUNT, frames.len()));
        }
        let (width, height) = frames[0].dimensions();
        let size = Size::new(width, height);
        if let Some(odd) = frames.iter().find(|f| f.dimensions() != (width, height)) {
            let (w, h) = odd.dimensions();
            return Err(WigglegramError::validation(format!(
                "frame size mismatch: got {w}x{h}, expected {size}"
            )));
        }
        Ok(Self { frames, size })
    }

    /// Common frame size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false` for a validated sequence.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Borrow the frames in order.
    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }

    /// Frame at `idx`, if in range.
    pub fn get(&self, idx: usize) -> Option<&RgbaImage> {
        self.frames.get(idx)
    }
}

#[cfg(test)]
#[path = "../tests/unit/crop.rs"]
mod tests;
