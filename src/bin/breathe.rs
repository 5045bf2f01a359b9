use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "breathe", version)]
struct Cli {
    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render a frame range as a numbered PNG sequence.
    Frames(FramesArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Print the scene configuration as JSON.
    Config(SceneArgs),
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Input scene JSON. The default two-blob scene is used when omitted.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Override the noise seed.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// First frame (inclusive).
    #[arg(long, default_value_t = 0)]
    start: u64,

    /// Last frame (exclusive). Defaults to the scene duration.
    #[arg(long)]
    end: Option<u64>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Overwrite output if it already exists.
    #[arg(long, default_value_t = true)]
    overwrite: bool,

    /// Mux the breath-driven drone track into the video.
    #[arg(long, default_value_t = false)]
    audio: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Render(args) => cmd_render(args),
        Command::Config(args) => cmd_config(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn load_scene(args: &SceneArgs) -> anyhow::Result<breathe::SceneConfig> {
    let mut cfg = match &args.in_path {
        Some(path) => breathe::SceneConfig::from_path(path)
            .with_context(|| format!("load scene '{}'", path.display()))?,
        None => breathe::SceneConfig::default(),
    };
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_scene(&args.scene)?;
    let opts = breathe::RenderSessionOpts {
        enable_audio: false,
        ..breathe::RenderSessionOpts::default()
    };
    let mut sess = breathe::RenderSession::new(&cfg, opts)?;
    let frame = sess.render_frame(breathe::FrameIndex(args.frame))?;

    breathe::encode::sink::write_png(&frame, &args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let cfg = load_scene(&args.scene)?;
    let end = args.end.unwrap_or(cfg.duration_frames);
    let range =
        breathe::FrameRange::new(breathe::FrameIndex(args.start), breathe::FrameIndex(end))?;

    let opts = breathe::RenderSessionOpts {
        enable_audio: false,
        ..breathe::RenderSessionOpts::default()
    };
    let mut sess = breathe::RenderSession::new(&cfg, opts)?;
    let mut sink = breathe::PngSequenceSink::new(&args.out);
    let stats = sess.render_range(range, &mut sink)?;

    eprintln!(
        "wrote {} frames to {}",
        stats.frames_rendered,
        args.out.display()
    );
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_scene(&args.scene)?;
    if args.audio {
        cfg.audio.enabled = true;
    }
    let mut sess = breathe::RenderSession::new(&cfg, breathe::RenderSessionOpts::default())?;
    let sink_opts = breathe::FfmpegSinkOpts {
        out_path: args.out.clone(),
        overwrite: args.overwrite,
        bg_rgba: cfg.background.to_rgba8(),
    };
    let mut sink = breathe::FfmpegSink::new(sink_opts);

    let range = breathe::FrameRange::new(
        breathe::FrameIndex(0),
        breathe::FrameIndex(cfg.duration_frames),
    )?;
    let stats = sess.render_range(range, &mut sink)?;
    tracing::info!(frames = stats.frames_rendered, "video encoded");

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_config(args: SceneArgs) -> anyhow::Result<()> {
    let cfg = load_scene(&args)?;
    println!("{}", cfg.to_json_pretty()?);
    Ok(())
}
