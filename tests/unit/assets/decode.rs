use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use super::*;

fn encode(img: RgbaImage, format: ImageFormat) -> Vec<u8> {
    let dyn_img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img).to_rgb8()),
        _ => DynamicImage::ImageRgba8(img),
    };
    let mut buf = Vec::new();
    dyn_img
        .write_to(&mut Cursor::new(&mut buf), format)
        .unwrap();
    buf
}

#[test]
fn decode_png_keeps_dimensions_and_pixels() {
    let img = RgbaImage::from_fn(3, 2, |x, y| Rgba([x as u8 * 10, y as u8 * 20, 7, 255]));
    let bytes = encode(img.clone(), ImageFormat::Png);

    let decoded = decode_image("b2.png", &bytes).unwrap();
    assert_eq!(decoded.name, "b2.png");
    assert_eq!(decoded.size().width, 3);
    assert_eq!(decoded.size().height, 2);
    assert_eq!(decoded.image, img);
}

#[test]
fn decode_jpeg_yields_opaque_rgba() {
    let img = RgbaImage::from_pixel(16, 8, Rgba([120, 60, 30, 255]));
    let bytes = encode(img, ImageFormat::Jpeg);

    let decoded = decode_image("x1.jpg", &bytes).unwrap();
    assert_eq!(decoded.image.dimensions(), (16, 8));
    assert!(decoded.image.pixels().all(|p| p[3] == 255));
}

#[test]
fn decode_rejects_other_formats() {
    let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
    let bytes = encode(img, ImageFormat::Bmp);

    let err = decode_image("x.bmp", &bytes).unwrap_err();
    assert!(matches!(err, WigglegramError::UnsupportedFormat(_)));
}

#[test]
fn decode_garbage_is_decode_error() {
    let err = decode_image("junk.jpg", b"definitely not an image").unwrap_err();
    assert!(matches!(err, WigglegramError::Decode(_)));
    assert!(err.to_string().contains("junk.jpg"));
}

#[test]
fn decode_truncated_png_is_decode_error() {
    let img = RgbaImage::from_pixel(32, 32, Rgba([1, 2, 3, 255]));
    let bytes = encode(img, ImageFormat::Png);

    let err = decode_image("cut.png", &bytes[..bytes.len() / 2]).unwrap_err();
    assert!(matches!(err, WigglegramError::Decode(_)));
}
