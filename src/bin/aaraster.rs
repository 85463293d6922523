use std::path::{Path, PathBuf};

use aaraster::NativeTarget as _;
use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "aaraster", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a scene JSON file to a PNG.
    Frame(FrameArgs),
    /// Resample an image to a new size and write it as PNG.
    Resample(ResampleArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ResampleArgs {
    /// Input image (any format the `image` crate decodes).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output width in pixels.
    #[arg(long)]
    width: u32,

    /// Output height in pixels.
    #[arg(long)]
    height: u32,

    /// Resampling quality.
    #[arg(long, value_enum, default_value_t = QualityChoice::High)]
    quality: QualityChoice,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum QualityChoice {
    Fast,
    Normal,
    High,
}

impl From<QualityChoice> for aaraster::ImageQuality {
    fn from(q: QualityChoice) -> Self {
        match q {
            QualityChoice::Fast => Self::Fast,
            QualityChoice::Normal => Self::Normal,
            QualityChoice::High => Self::HighQuality,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Resample(args) => cmd_resample(args),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut scene = aaraster::Scene::from_path(&args.in_path)?;
    scene.opts = Some(scene.opts.unwrap_or_default().with_env_overrides());

    let root = args.in_path.parent().unwrap_or_else(|| Path::new("."));
    let frame = scene
        .render(root)
        .with_context(|| format!("render scene '{}'", args.in_path.display()))?;

    write_png(&args.out, &frame)
}

fn cmd_resample(args: ResampleArgs) -> anyhow::Result<()> {
    if args.width == 0 || args.height == 0 {
        anyhow::bail!("--width and --height must be > 0");
    }
    let image = aaraster::scene::load_image(&args.in_path)?;
    let mut frame = aaraster::BitmapTarget::new(aaraster::DomainId(0), args.width, args.height)?;
    aaraster::draw_image(
        &mut frame,
        &image,
        image.bounds(),
        aaraster::PixelRect::new(0, 0, args.width, args.height),
        args.quality.into(),
    );

    write_png(&args.out, &frame)
}

fn write_png(out: &Path, frame: &aaraster::BitmapTarget) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        out,
        &frame.to_straight_rgba(),
        frame.width(),
        frame.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;

    eprintln!("wrote {}", out.display());
    Ok(())
}
