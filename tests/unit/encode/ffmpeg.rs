use super::*;
use crate::encode::sink::AudioInputConfig;
use crate::foundation::core::Fps;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::new(30, 1).unwrap(),
        frame_count: 1,
        audio: None,
        title: None,
    }
}

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_alpha_255_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn flatten_half_alpha_blends_with_bg() {
    // Premultiplied half-transparent red over white.
    let src = vec![128u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, [255, 255, 255, 255]).unwrap();
    assert_eq!(dst, vec![255, 127, 127, 255]);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_to_opaque_rgba8(&mut dst, &[0u8; 4], [0, 0, 0, 255]).is_err());
}

#[test]
fn partial_path_is_hidden_sibling() {
    let p = partial_path_for(Path::new("outputs/20250101_120000_Headline.mp4"));
    assert_eq!(p.parent(), Some(Path::new("outputs")));
    let name = p.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with(".20250101_120000_Headline.mp4."));
    assert!(name.ends_with(".partial"));
}

#[test]
fn begin_rejects_bad_geometry_before_spawning() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.mp4");

    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out));
    assert!(matches!(
        sink.begin(cfg(0, 10)),
        Err(ReelError::Validation { .. })
    ));
    assert!(matches!(
        sink.begin(cfg(11, 10)),
        Err(ReelError::Validation { .. })
    ));
    drop(sink);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn begin_refuses_existing_output_without_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.mp4");
    std::fs::write(&out, b"old").unwrap();

    let mut opts = FfmpegSinkOpts::new(&out);
    opts.overwrite = false;
    let mut sink = FfmpegSink::new(opts);
    assert!(sink.begin(cfg(16, 16)).is_err());
    assert_eq!(std::fs::read(&out).unwrap(), b"old");
}

#[test]
fn push_before_begin_is_an_error() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    };
    assert!(matches!(
        sink.push_frame(FrameIndex(0), &frame),
        Err(ReelError::Encode(_))
    ));
}

fn args_as_strings(args: &[OsString]) -> Vec<String> {
    args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
}

fn has_pair(args: &[String], flag: &str, value: &str) -> bool {
    args.windows(2).any(|w| w[0] == flag && w[1] == value)
}

#[test]
fn encoder_args_request_h264_aac_faststart_mp4() {
    let mut c = cfg(360, 640);
    c.audio = Some(AudioInputConfig {
        path: PathBuf::from("/tmp/mix.f32le"),
        sample_rate: 44_100,
        channels: 2,
    });
    c.title = Some("Morning news".to_string());
    let args = args_as_strings(&encoder_args(&c, Path::new("/tmp/.out.mp4.1.partial")).unwrap());

    assert!(has_pair(&args, "-s", "360x640"));
    assert!(has_pair(&args, "-r", "30/1"));
    assert!(has_pair(&args, "-c:v", "libx264"));
    assert!(has_pair(&args, "-pix_fmt", "yuv420p"));
    assert!(has_pair(&args, "-c:a", "aac"));
    assert!(has_pair(&args, "-i", "/tmp/mix.f32le"));
    assert!(has_pair(&args, "-movflags", "+faststart"));
    assert!(has_pair(&args, "-f", "mp4"));
    assert!(has_pair(&args, "-metadata", "title=Morning news"));
    // Output rate equals the mix rate.
    let ar: Vec<_> = args
        .windows(2)
        .filter(|w| w[0] == "-ar")
        .map(|w| w[1].as_str())
        .collect();
    assert_eq!(ar, vec!["44100", "44100"]);
    assert_eq!(args.last().map(String::as_str), Some("/tmp/.out.mp4.1.partial"));
}

#[test]
fn encoder_args_without_audio_disable_audio_stream() {
    let args = args_as_strings(&encoder_args(&cfg(16, 16), Path::new("o.mp4")).unwrap());
    assert!(args.iter().any(|a| a == "-an"));
    assert!(!args.iter().any(|a| a == "aac"));
    assert!(has_pair(&args, "-movflags", "+faststart"));
}

#[test]
fn encoder_args_reject_zero_rate_audio() {
    let mut c = cfg(16, 16);
    c.audio = Some(AudioInputConfig {
        path: PathBuf::from("mix.f32le"),
        sample_rate: 0,
        channels: 2,
    });
    assert!(matches!(
        encoder_args(&c, Path::new("o.mp4")),
        Err(ReelError::Validation { .. })
    ));
}

#[test]
fn publish_without_overwrite_keeps_file_created_during_encode() {
    let dir = tempfile::tempdir().unwrap();
    let partial = dir.path().join(".out.mp4.1.partial");
    let out = dir.path().join("out.mp4");
    std::fs::write(&partial, b"new").unwrap();
    std::fs::write(&out, b"other job").unwrap();

    let err = publish_partial(&partial, &out, false).unwrap_err();
    assert!(matches!(err, ReelError::Validation { .. }));
    assert_eq!(std::fs::read(&out).unwrap(), b"other job");
    assert!(!partial.exists());
}

#[test]
fn publish_moves_partial_into_place() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.mp4");

    let partial = dir.path().join(".out.mp4.1.partial");
    std::fs::write(&partial, b"first").unwrap();
    publish_partial(&partial, &out, false).unwrap();
    assert_eq!(std::fs::read(&out).unwrap(), b"first");
    assert!(!partial.exists());

    std::fs::write(&partial, b"second").unwrap();
    publish_partial(&partial, &out, true).unwrap();
    assert_eq!(std::fs::read(&out).unwrap(), b"second");
    assert!(!partial.exists());
}

#[test]
fn straight_alpha_frames_are_rejected() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    sink.cfg = Some(cfg(2, 2));
    sink.scratch = vec![0; 16];
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: false,
    };
    assert!(matches!(
        sink.push_frame(FrameIndex(0), &frame),
        Err(ReelError::Validation { .. })
    ));
}
