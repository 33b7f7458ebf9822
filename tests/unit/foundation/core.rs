use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert_eq!(Fps::new(30, 1).unwrap(), Fps::default());
}

#[test]
fn frames_for_secs_rounds_and_never_returns_zero() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.frames_for_secs(11.0), 330);
    assert_eq!(fps.frames_for_secs(0.01), 1);
    assert_eq!(fps.frames_for_secs(1.02), 31);
    assert!((fps.frame_to_secs(FrameIndex(15)) - 0.5).abs() < 1e-12);
}

#[test]
fn resolution_presets_are_portrait() {
    assert_eq!(
        Resolution::Preview.canvas(),
        Canvas {
            width: 360,
            height: 640
        }
    );
    assert_eq!(
        Resolution::Full.canvas(),
        Canvas {
            width: 1080,
            height: 1920
        }
    );
    assert_eq!(
        Resolution::Custom {
            width: 64,
            height: 36
        }
        .canvas(),
        Canvas {
            width: 64,
            height: 36
        }
    );
}

#[test]
fn canvas_validation_requires_even_non_zero() {
    assert!(Canvas { width: 0, height: 2 }.validate().is_err());
    assert!(Canvas { width: 3, height: 2 }.validate().is_err());
    assert!(Resolution::Preview.canvas().validate().is_ok());
}

#[test]
fn resolution_deserializes_from_snake_case() {
    let r: Resolution = serde_json::from_str("\"preview\"").unwrap();
    assert_eq!(r, Resolution::Preview);
    let r: Resolution = serde_json::from_str(r#"{"custom":{"width":8,"height":4}}"#).unwrap();
    assert_eq!(r.canvas(), Canvas { width: 8, height: 4 });
}

#[test]
fn premultiply_scales_color_by_alpha() {
    assert_eq!(premultiply_rgba([255, 0, 0, 255]), [255, 0, 0, 255]);
    assert_eq!(premultiply_rgba([255, 100, 0, 128]), [128, 50, 0, 128]);
    assert_eq!(premultiply_rgba([9, 9, 9, 0]), [0, 0, 0, 0]);
}

#[test]
fn rgba_len_does_not_overflow_u32() {
    assert_eq!(Canvas::new(36, 64).rgba_len(), 36 * 64 * 4);
    let huge = Canvas::new(32_768, 32_768);
    assert!(huge.validate().is_ok());
    if cfg!(target_pointer_width = "64") {
        assert_eq!(huge.rgba_len(), 4usize << 30);
    }
}
