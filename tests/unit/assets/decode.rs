use std::io::Cursor;

use super::*;

fn png_bytes(img: RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_keeps_dimensions() {
    let img = RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
    let decoded = decode_image(&png_bytes(img)).unwrap();
    assert_eq!(decoded.dimensions(), (3, 2));
    assert_eq!(decoded.get_pixel(2, 1).0, [10, 20, 30, 255]);
}

#[test]
fn decode_rejects_non_image_bytes() {
    assert!(decode_image(b"This is a placeholder for testing.").is_err());
}

#[test]
fn fit_width_preserves_aspect() {
    assert_eq!(fit_width_to_height(1024, 1024, 640), 640);
    assert_eq!(fit_width_to_height(1920, 1080, 640), 1138);
    assert_eq!(fit_width_to_height(1, 1000, 10), 1);
}

#[test]
fn prepare_scales_to_target_height() {
    let img = RgbaImage::from_pixel(8, 4, image::Rgba([200, 100, 50, 255]));
    let prepared = prepare_for_height(&img, 8);
    assert_eq!((prepared.width, prepared.height), (16, 8));
    assert_eq!(prepared.rgba8_premul.len(), 16 * 8 * 4);
    let px = &prepared.rgba8_premul[..4];
    for (got, want) in px.iter().zip([200u8, 100, 50, 255]) {
        assert!(got.abs_diff(want) <= 1, "got {px:?}");
    }
}

#[test]
fn prepare_premultiplies_alpha() {
    let img = RgbaImage::from_pixel(1, 1, image::Rgba([100, 50, 200, 128]));
    let prepared = prepare_for_height(&img, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}
