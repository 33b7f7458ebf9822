use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::assets::media::is_ffmpeg_on_path;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::compose::FrameRGBA;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Final MP4 path. Only ever written by renaming a finished encode into place.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Background color used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw frames to stdin.
///
/// ffmpeg writes H.264/AAC MP4 with the moov atom at the head of the file (`+faststart`) into a
/// hidden partial file beside the output; `end` renames it over `out_path` once ffmpeg succeeds.
/// Failures and drops before `end` remove the partial file.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    partial_path: Option<PathBuf>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            partial_path: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
        }
    }

    pub fn out_path(&self) -> &Path {
        &self.opts.out_path
    }

    fn abort(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
        if let Some(partial) = self.partial_path.take() {
            let _ = std::fs::remove_file(partial);
        }
        self.cfg = None;
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(ReelError::validation("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(ReelError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(ReelError::validation(
                "ffmpeg sink width/height must be even (required for yuv420p mp4 output)",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(ReelError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(ReelError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let partial = partial_path_for(&self.opts.out_path);

        let args = encoder_args(&cfg, &partial)?;
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .args(&args);

        tracing::debug!(out = %self.opts.out_path.display(), partial = %partial.display(), "spawning ffmpeg");

        let mut child = cmd.spawn().map_err(|e| {
            ReelError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        // Partial output exists from here on; `abort` cleans it up.
        self.partial_path = Some(partial);

        let stdin = child.stdin.take();
        let stderr = child.stderr.take();
        self.child = Some(child);
        let (Some(stdin), Some(mut stderr)) = (stdin, stderr) else {
            self.abort();
            return Err(ReelError::encode("failed to open ffmpeg stdio (unexpected)"));
        };
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.scratch = vec![0u8; Canvas::new(cfg.width, cfg.height).rgba_len()];
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ReelError::encode("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(ReelError::encode(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(ReelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(ReelError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }
        if !frame.premultiplied {
            return Err(ReelError::validation(
                "ffmpeg sink expects premultiplied frames",
            ));
        }

        flatten_to_opaque_rgba8(&mut self.scratch, &frame.data, self.opts.bg_rgba)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ReelError::encode("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        if let Err(e) = stdin.write_all(&self.scratch) {
            // ffmpeg most likely died; surface its diagnostics rather than the broken pipe.
            let stderr = self.collect_stderr();
            self.abort();
            return Err(ReelError::encode(format!(
                "failed to write frame to ffmpeg stdin: {e}: {}",
                stderr.trim()
            )));
        }
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| ReelError::encode("ffmpeg sink not started"))?;

        let status = match child.wait() {
            Ok(s) => s,
            Err(e) => {
                self.abort();
                return Err(ReelError::encode(format!(
                    "failed to wait for ffmpeg to finish: {e}"
                )));
            }
        };
        let stderr = self.collect_stderr();

        if !status.success() {
            self.abort();
            return Err(ReelError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        let partial = self
            .partial_path
            .take()
            .ok_or_else(|| ReelError::encode("ffmpeg sink lost its partial output path"))?;
        publish_partial(&partial, &self.opts.out_path, self.opts.overwrite)?;

        self.cfg = None;
        Ok(())
    }
}

impl FfmpegSink {
    fn collect_stderr(&mut self) -> String {
        let Some(handle) = self.stderr_drain.take() else {
            return String::new();
        };
        if self.stdin.is_some() {
            // The drain only finishes once ffmpeg exits.
            drop(self.stdin.take());
            if let Some(child) = self.child.as_mut() {
                let _ = child.wait();
            }
        }
        match handle.join() {
            Ok(Ok(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
            Ok(Err(e)) => format!("(ffmpeg stderr read failed: {e})"),
            Err(_) => "(ffmpeg stderr drain thread panicked)".to_string(),
        }
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if self.child.is_some() || self.partial_path.is_some() {
            self.abort();
        }
    }
}

/// ffmpeg arguments for encoding raw RGBA on stdin (plus optional f32le audio) into `out`.
///
/// H.264 `yuv420p` video, AAC audio at the mix rate, moov atom first (`+faststart`).
fn encoder_args(cfg: &SinkConfig, out: &Path) -> ReelResult<Vec<OsString>> {
    let mut args: Vec<OsString> = Vec::new();
    push_args(&mut args, &["-y", "-loglevel", "error"]);
    // Input: raw RGBA8 frames, flattened to opaque in push_frame. `-r` before `-i` sets the
    // input framerate.
    push_args(
        &mut args,
        &[
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i",
            "pipe:0",
        ],
    );

    match cfg.audio.as_ref() {
        Some(audio) => {
            if audio.sample_rate == 0 {
                return Err(ReelError::validation(
                    "audio sample_rate must be non-zero when audio is enabled",
                ));
            }
            if audio.channels == 0 {
                return Err(ReelError::validation(
                    "audio channels must be non-zero when audio is enabled",
                ));
            }
            let rate = audio.sample_rate.to_string();
            push_args(
                &mut args,
                &[
                    "-f",
                    "f32le",
                    "-ar",
                    &rate,
                    "-ac",
                    &audio.channels.to_string(),
                    "-i",
                ],
            );
            args.push(audio.path.clone().into_os_string());
            push_args(
                &mut args,
                &["-c:v", "libx264", "-pix_fmt", "yuv420p", "-c:a", "aac", "-ar", &rate],
            );
        }
        None => push_args(&mut args, &["-an", "-c:v", "libx264", "-pix_fmt", "yuv420p"]),
    }

    if let Some(title) = cfg.title.as_deref() {
        args.push("-metadata".into());
        args.push(format!("title={title}").into());
    }
    push_args(&mut args, &["-movflags", "+faststart", "-f", "mp4"]);
    args.push(out.as_os_str().to_owned());
    Ok(args)
}

fn push_args(args: &mut Vec<OsString>, items: &[&str]) {
    args.extend(items.iter().map(OsString::from));
}

/// Move the finished encode at `partial` to `out`.
///
/// Without `overwrite` the move is a hard link, so a file that appeared at `out` during the
/// encode is kept and the call fails. `partial` is gone afterwards either way.
fn publish_partial(partial: &Path, out: &Path, overwrite: bool) -> ReelResult<()> {
    let moved = if overwrite {
        std::fs::rename(partial, out)
    } else {
        std::fs::hard_link(partial, out).and_then(|()| std::fs::remove_file(partial))
    };
    if let Err(e) = moved {
        let _ = std::fs::remove_file(partial);
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            return Err(ReelError::validation(format!(
                "output file '{}' already exists",
                out.display()
            )));
        }
        return Err(ReelError::encode(format!(
            "failed to move '{}' to '{}': {e}",
            partial.display(),
            out.display()
        )));
    }
    Ok(())
}

/// Hidden sibling of `out_path` that ffmpeg encodes into.
pub fn partial_path_for(out_path: &Path) -> PathBuf {
    let name = out_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.mp4".to_string());
    out_path.with_file_name(format!(".{name}.{}.partial", std::process::id()))
}

/// Composite premultiplied `src` over the opaque `bg_rgba` (straight alpha) into `dst`.
fn flatten_to_opaque_rgba8(dst: &mut [u8], src: &[u8], bg_rgba: [u8; 4]) -> ReelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ReelError::validation(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg = [
        u16::from(bg_rgba[0]),
        u16::from(bg_rgba[1]),
        u16::from(bg_rgba[2]),
    ];

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        for c in 0..3 {
            d[c] = (u16::from(s[c]) + mul_div255_u16(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }

    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
