use image::Rgba;

use super::*;

/// Every pixel encodes its own source coordinates, so crops can be traced back.
fn coord_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x & 0xff) as u8, (x >> 8) as u8, (y & 0xff) as u8, (y >> 8) as u8])
    })
}

fn source_coord(px: &Rgba<u8>) -> (u32, u32) {
    (
        u32::from(px[0]) | (u32::from(px[1]) << 8),
        u32::from(px[2]) | (u32::from(px[3]) << 8),
    )
}

fn named(sizes: &[(u32, u32)]) -> Vec<NamedImage> {
    sizes
        .iter()
        .enumerate()
        .map(|(i, &(w, h))| NamedImage::new(format!("f{i}"), coord_image(w, h)))
        .collect()
}

#[test]
fn common_size_is_elementwise_min() {
    let sizes = [
        Size::new(200, 150),
        Size::new(180, 160),
        Size::new(190, 140),
        Size::new(210, 155),
    ];
    assert_eq!(common_size(&sizes), Some(Size::new(180, 140)));
    assert_eq!(common_size(&[]), None);
}

#[test]
fn offsets_floor_half_the_excess() {
    assert_eq!(crop_offset(200, 180), 10);
    assert_eq!(crop_offset(155, 140), 7);
    assert_eq!(crop_offset(180, 180), 0);
    assert_eq!(crop_offset(3, 0), 1);
}

#[test]
fn crops_are_centered_subrectangles() {
    let sizes = [(200, 150), (180, 160), (190, 140), (210, 155)];
    let images = named(&sizes);
    let cropped = crop_to_common_size(&images).unwrap();

    assert_eq!(cropped.len(), 4);
    for (out, &(w, h)) in cropped.iter().zip(sizes.iter()) {
        assert_eq!(out.dimensions(), (180, 140));
        let (x0, y0) = ((w - 180) / 2, (h - 140) / 2);
        assert_eq!(source_coord(out.get_pixel(0, 0)), (x0, y0));
        assert_eq!(source_coord(out.get_pixel(179, 139)), (x0 + 179, y0 + 139));
        for (x, y, px) in out.enumerate_pixels() {
            assert_eq!(source_coord(px), (x0 + x, y0 + y));
        }
    }
}

#[test]
fn minimum_axis_gets_zero_offset() {
    let images = named(&[(100, 80), (120, 80)]);
    let cropped = crop_to_common_size(&images).unwrap();
    assert_eq!(source_coord(cropped[0].get_pixel(0, 0)), (0, 0));
    assert_eq!(source_coord(cropped[1].get_pixel(0, 0)), (10, 0));
}

#[test]
fn cropping_is_idempotent() {
    let images = named(&[(33, 47), (31, 50), (40, 45), (35, 46)]);
    let first = crop_to_common_size(&images).unwrap();
    let second = crop_to_common_size(&images).unwrap();
    assert_eq!(first, second);

    let renamed: Vec<NamedImage> = first
        .iter()
        .map(|img| NamedImage::new("again", img.clone()))
        .collect();
    assert_eq!(crop_to_common_size(&renamed).unwrap(), first);
}

#[test]
fn empty_set_is_rejected() {
    assert!(crop_to_common_size(&[]).is_err());
}

#[test]
fn center_crop_rejects_larger_target() {
    let img = coord_image(10, 10);
    assert!(center_crop(&img, Size::new(11, 10)).is_err());
    assert_eq!(center_crop(&img, Size::new(10, 10)).unwrap(), img);
}

#[test]
fn sequence_requires_exactly_four_frames() {
    for n in [0usize, 1, 3, 5] {
        let frames = vec![coord_image(4, 4); n];
        let err = FrameSequence::new(frames).unwrap_err();
        assert!(matches!(
            err,
            WigglegramError::InvalidInputCount { expected: 4, got } if got == n
        ));
    }
    let seq = FrameSequence::new(vec![coord_image(4, 3); 4]).unwrap();
    assert_eq!(seq.size(), Size::new(4, 3));
    assert_eq!(seq.len(), 4);
}

#[test]
fn sequence_rejects_mixed_sizes() {
    let frames = vec![
        coord_image(4, 4),
        coord_image(4, 4),
        coord_image(5, 4),
        coord_image(4, 4),
    ];
    assert!(matches!(
        FrameSequence::new(frames),
        Err(WigglegramError::Validation(_))
    ));
}
