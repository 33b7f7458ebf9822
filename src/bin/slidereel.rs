use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use slidereel::assets::adapter::prepare_slides;
use slidereel::assets::media::{is_ffmpeg_on_path, is_ffprobe_on_path};
use slidereel::manifest::load_manifest;
use slidereel::output::{find_existing_video, output_path_now};
use slidereel::{AssembleConfig, Fps, Resolution, Timeline};

#[derive(Parser, Debug)]
#[command(name = "slidereel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble a slide manifest into an MP4 (requires `ffmpeg` and `ffprobe` on PATH).
    Render(RenderArgs),
    /// Print the timeline for a list of audio durations as JSON.
    Timeline(TimelineArgs),
    /// Decode every slide of a manifest and print durations and the timeline as JSON.
    Probe(ProbeArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Slide manifest JSON.
    #[arg(long)]
    manifest: PathBuf,

    /// Output MP4 path. Defaults to a timestamped name in `--out-dir`.
    #[arg(long, conflicts_with = "out_dir")]
    out: Option<PathBuf>,

    /// Directory for timestamped output names.
    #[arg(long, default_value = "outputs")]
    out_dir: PathBuf,

    /// Headline used for the output name and title metadata (falls back to the manifest's).
    #[arg(long)]
    headline: Option<String>,

    /// Render at preview resolution (360x640).
    #[arg(long)]
    preview: bool,

    /// Frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Transition overlap in seconds.
    #[arg(long, default_value_t = slidereel::timeline::timing::DEFAULT_TRANSITION_SECS)]
    transition: f64,

    /// Skip rendering when `--out-dir` already holds a video for this headline.
    #[arg(long)]
    skip_existing: bool,
}

#[derive(Parser, Debug)]
struct TimelineArgs {
    /// Audio durations in seconds, comma separated.
    #[arg(long, value_delimiter = ',', required = true)]
    durations: Vec<f64>,

    /// Transition overlap in seconds.
    #[arg(long, default_value_t = slidereel::timeline::timing::DEFAULT_TRANSITION_SECS)]
    transition: f64,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Slide manifest JSON.
    #[arg(long)]
    manifest: PathBuf,

    /// Transition overlap in seconds.
    #[arg(long, default_value_t = slidereel::timeline::timing::DEFAULT_TRANSITION_SECS)]
    transition: f64,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Timeline(args) => cmd_timeline(args),
        Command::Probe(args) => cmd_probe(args),
    }
}

fn require_ffmpeg() -> anyhow::Result<()> {
    if !is_ffmpeg_on_path() || !is_ffprobe_on_path() {
        anyhow::bail!("ffmpeg and ffprobe must be installed and on PATH");
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    require_ffmpeg()?;

    let (manifest, slides) = load_manifest(&args.manifest)?;
    let headline = args.headline.or(manifest.headline);

    let out_path = match args.out {
        Some(out) => out,
        None => {
            if args.skip_existing
                && let Some(h) = headline.as_deref()
                && let Some(existing) = find_existing_video(&args.out_dir, h)?
            {
                tracing::info!(
                    path = %existing.display(),
                    "video already exists for headline, skipping"
                );
                println!("{}", existing.display());
                return Ok(());
            }
            output_path_now(&args.out_dir, headline.as_deref())
        }
    };

    let resolution = if args.preview {
        Resolution::Preview
    } else {
        Resolution::Full
    };
    let mut cfg = AssembleConfig::new(out_path.clone())
        .with_resolution(resolution)
        .with_fps(Fps::new(args.fps, 1)?)
        .with_transition_sec(args.transition);
    cfg.title = headline;

    let report = slidereel::assemble_to_mp4(&slides, &cfg)
        .with_context(|| format!("assemble '{}'", args.manifest.display()))?;
    eprintln!(
        "wrote {} ({} slides, {:.2}s, {} frames)",
        out_path.display(),
        report.timeline.len(),
        report.timeline.total_sec,
        report.frame_count
    );
    println!("{}", out_path.display());
    Ok(())
}

fn cmd_timeline(args: TimelineArgs) -> anyhow::Result<()> {
    let timeline = Timeline::compute(&args.durations, args.transition)?;
    println!("{}", serde_json::to_string_pretty(&timeline)?);
    Ok(())
}

#[derive(serde::Serialize)]
struct ProbeSlide {
    index: usize,
    title: Option<String>,
    duration_sec: f64,
    sample_rate: u32,
    width: u32,
    height: u32,
}

#[derive(serde::Serialize)]
struct ProbeReport {
    slides: Vec<ProbeSlide>,
    timeline: Timeline,
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    require_ffmpeg()?;

    let (_, slides) = load_manifest(&args.manifest)?;
    let workdir = tempfile::Builder::new()
        .prefix("slidereel-probe-")
        .tempdir()
        .context("create temporary directory")?;
    let prepared = prepare_slides(&slides, workdir.path())?;

    let durations: Vec<f64> = prepared.iter().map(|s| s.audio_duration_sec()).collect();
    let timeline = Timeline::compute(&durations, args.transition)?;
    let report = ProbeReport {
        slides: prepared
            .iter()
            .map(|s| ProbeSlide {
                index: s.index,
                title: s.title.clone(),
                duration_sec: s.audio_duration_sec(),
                sample_rate: s.source_sample_rate,
                width: s.image.width(),
                height: s.image.height(),
            })
            .collect(),
        timeline,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
