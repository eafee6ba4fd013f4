use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "wigglegram", version, about = "Turn four half-frames into a wigglegram")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a looping animated GIF (0.3 s per frame).
    Gif(GifArgs),
    /// Write an H.264 MP4 clip (requires `ffmpeg` on PATH).
    Mp4(Mp4Args),
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// The four half-frame images (JPEG or PNG).
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Frame order.
    #[arg(long, value_enum, default_value_t = OrderChoice::AsGiven)]
    order: OrderChoice,

    /// Output file name without extension.
    #[arg(long, default_value = wigglegram::DEFAULT_STEM)]
    stem: String,

    /// Print a JSON summary of the artifact to stdout.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct GifArgs {
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser, Debug)]
struct Mp4Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Clip length in seconds.
    #[arg(
        long,
        default_value_t = wigglegram::DEFAULT_VIDEO_SECS,
        value_parser = clap::value_parser!(u32).range(
            i64::from(wigglegram::MIN_VIDEO_SECS)..=i64::from(wigglegram::MAX_VIDEO_SECS)
        )
    )]
    seconds: u32,

    /// How four frames are stretched to the clip length.
    #[arg(long, value_enum, default_value_t = PolicyChoice::FrameRepetition)]
    policy: PolicyChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrderChoice {
    /// Keep the order given on the command line.
    AsGiven,
    /// Sort by the number at the end of each file name.
    TrailingNumber,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyChoice {
    /// Fixed 10 fps, frames cycled to fill the clip.
    FrameRepetition,
    /// Each frame once, fps scaled to fill the clip.
    RateScaling,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Gif(args) => cmd_run(args.common, wigglegram::OutputFormat::Gif, None),
        Command::Mp4(args) => {
            let duration = wigglegram::VideoDuration::from_secs(args.seconds)?;
            let policy = match args.policy {
                PolicyChoice::FrameRepetition => wigglegram::VideoPolicy::FrameRepetition,
                PolicyChoice::RateScaling => wigglegram::VideoPolicy::RateScaling,
            };
            cmd_run(
                args.common,
                wigglegram::OutputFormat::Mp4,
                Some((duration, policy)),
            )
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_run(
    args: CommonArgs,
    format: wigglegram::OutputFormat,
    video: Option<(wigglegram::VideoDuration, wigglegram::VideoPolicy)>,
) -> anyhow::Result<()> {
    let inputs = read_inputs(&args.images)?;

    let mut req = wigglegram::Request::new(inputs);
    req.format = format;
    req.stem = args.stem;
    req.order = match args.order {
        OrderChoice::AsGiven => wigglegram::InputOrder::AsGiven,
        OrderChoice::TrailingNumber => wigglegram::InputOrder::TrailingNumber,
    };
    if let Some((duration, policy)) = video {
        req.duration = duration;
        req.policy = policy;
    }

    let artifact = wigglegram::run(&req)?;
    let path = artifact.write_to_dir(&args.out)?;

    if args.json {
        let summary = artifact.summary();
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("serialize artifact summary")?
        );
    }

    eprintln!("wrote {}", path.display());
    Ok(())
}

fn read_inputs(paths: &[PathBuf]) -> anyhow::Result<Vec<wigglegram::InputImage>> {
    if paths.len() != wigglegram::FRAME_COUNT {
        anyhow::bail!(
            "expected exactly {} images, got {}",
            wigglegram::FRAME_COUNT,
            paths.len()
        );
    }
    paths
        .iter()
        .map(|p| read_input(p))
        .collect::<anyhow::Result<Vec<_>>>()
}

fn read_input(path: &Path) -> anyhow::Result<wigglegram::InputImage> {
    wigglegram::InputImage::from_path(path)
        .with_context(|| format!("load input '{}'", path.display()))
}
