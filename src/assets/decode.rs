use image::ImageFormat;

use crate::{
    assets::NamedImage,
    foundation::error::{WigglegramError, WigglegramResult},
};

/// Decode one upload into straight-alpha RGBA8.
///
/// Only JPEG and PNG are accepted; the format is sniffed from the bytes, not the name.
pub fn decode_image(name: &str, bytes: &[u8]) -> WigglegramResult<NamedImage> {
    let format = image::guess_format(bytes)
        .map_err(|e| WigglegramError::decode(format!("'{name}': {e}")))?;
    if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
        return Err(WigglegramError::unsupported_format(format!(
            "'{name}' is {format:?}, expected JPEG or PNG"
        )));
    }

    let dyn_img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| WigglegramError::decode(format!("'{name}': {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(WigglegramError::decode(format!("'{name}' has no pixels")));
    }

    tracing::debug!(name, ?format, width, height, "decoded image");
    Ok(NamedImage::new(name, rgba))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
