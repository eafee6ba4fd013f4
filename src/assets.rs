//! Image loading: uploaded bytes in, RGBA8 pixel grids out.

/// Decoding of JPEG/PNG bytes into RGBA8 images.
pub mod decode;
/// Raw uploads as received from the caller.
pub mod input;

use image::RgbaImage;

use crate::foundation::core::Size;

/// A decoded image together with the name it was uploaded under.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedImage {
    /// Upload file name, used for ordering and diagnostics.
    pub name: String,
    /// Decoded pixels, straight-alpha RGBA8.
    pub image: RgbaImage,
}

impl NamedImage {
    /// Wrap an already decoded image.
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }

    /// Pixel dimensions.
    pub fn size(&self) -> Size {
        let (width, height) = self.image.dimensions();
        Size::new(width, height)
    }
}
