use std::io::Cursor;

use super::*;
use crate::assets::source::MediaSource;

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, image::Rgba([0, 128, 255, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn tone(sample_rate: u32, secs: f64) -> AudioPcm {
    let frames = (f64::from(sample_rate) * secs) as usize;
    AudioPcm::new(sample_rate, 2, vec![0.1; frames * 2])
}

#[test]
fn pcm_slides_prepare_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let slides = vec![
        Slide::new(png(4, 8), tone(100, 2.0)).with_title("a"),
        Slide::new(png(8, 8), tone(200, 1.5)),
    ];
    let prepared = prepare_slides(&slides, dir.path()).unwrap();

    assert_eq!(prepared.len(), 2);
    assert_eq!(prepared[0].index, 0);
    assert_eq!(prepared[0].title.as_deref(), Some("a"));
    assert_eq!(prepared[0].image.dimensions(), (4, 8));
    assert!((prepared[0].audio_duration_sec() - 2.0).abs() < 1e-9);
    assert_eq!(prepared[1].source_sample_rate, 200);
    assert!((prepared[1].audio_duration_sec() - 1.5).abs() < 1e-9);
}

#[test]
fn no_slides_is_empty_timeline() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        prepare_slides(&[], dir.path()),
        Err(ReelError::EmptyTimeline)
    ));
}

#[test]
fn undecodable_image_is_media_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let slides = vec![
        Slide::new(png(2, 2), tone(100, 1.0)),
        Slide::new(b"Sample image data".to_vec(), tone(100, 1.0)),
    ];
    let err = prepare_slides(&slides, dir.path()).unwrap_err();
    assert!(matches!(err, ReelError::MediaDecode { slide: 1, .. }));
}

#[test]
fn missing_image_file_is_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let slides = vec![Slide::new(
        MediaSource::path(dir.path().join("missing.jpg")),
        tone(100, 1.0),
    )];
    let err = prepare_slides(&slides, dir.path()).unwrap_err();
    assert!(matches!(err, ReelError::Validation { slide: Some(0), .. }));
}

#[test]
fn empty_pcm_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let slides = vec![Slide::new(png(2, 2), AudioPcm::new(48_000, 2, Vec::new()))];
    let err = prepare_slides(&slides, dir.path()).unwrap_err();
    assert_eq!(err.slide(), Some(0));

    let slides = vec![Slide::new(png(2, 2), AudioPcm::new(0, 2, vec![0.0; 4]))];
    assert!(prepare_slides(&slides, dir.path()).is_err());
}
