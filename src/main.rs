use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::io::{stdout, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use stitchfair::{
    average_files, color_to_hex, parse_palette, preprocess, quantize, rank_palette,
    select_targets, sort_by_hue, PosterizeReport,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Posterize images into embroidery thread colors
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Repaint an image with a few colors picked from a thread palette
    Posterize(PosterizeArgs),
    /// Print the average color of each swatch image
    Average {
        /// Swatch image paths
        #[arg(required = true)]
        swatches: Vec<PathBuf>,
    },
    /// Print a palette file in hue order, prefixed with each color's rank
    Rank {
        /// Palette file, one #RRGGBB per line
        palette: PathBuf,
    },
}

#[derive(Args)]
struct PosterizeArgs {
    /// Input image path
    img: PathBuf,

    /// Thread palette file, one #RRGGBB per line
    #[arg(short, long)]
    palette: PathBuf,

    /// Output PNG path
    #[arg(short, long)]
    output: PathBuf,

    /// Number of thread colors to use, at least 3
    #[arg(short, long, default_value_t = 5)]
    count: usize,

    /// Resize to this width before posterizing
    #[arg(long, requires = "height", value_parser = clap::value_parser!(u32).range(1..))]
    width: Option<u32>,

    /// Resize to this height before posterizing
    #[arg(long, requires = "width", value_parser = clap::value_parser!(u32).range(1..))]
    height: Option<u32>,

    /// Seed for picking thread colors; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Also write a JSON report with the PNG and every pixel's hex color
    #[arg(long)]
    report: Option<PathBuf>,
}

fn read_palette_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn posterize(args: &PosterizeArgs) -> Result<()> {
    let mut img = image::open(&args.img)
        .with_context(|| format!("failed to open {}", args.img.display()))?
        .to_rgba8();
    if let (Some(width), Some(height)) = (args.width, args.height) {
        img = preprocess::resize(&img, width, height);
    }
    let img = preprocess::trim_transparent(&img);

    let threads = sort_by_hue(&parse_palette(&read_palette_file(&args.palette)?)?);
    info!(threads = threads.len(), "loaded thread palette");

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let targets = select_targets(&img, &threads, args.count, &mut rng)?;
    info!(
        targets = ?targets.colors().iter().map(|&c| color_to_hex(c)).collect::<Vec<_>>(),
        "selected thread colors"
    );

    let posterized = quantize(&img, &targets)?;
    posterized
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!(
        path = %args.output.display(),
        width = posterized.width(),
        height = posterized.height(),
        "wrote posterized image"
    );

    if let Some(path) = &args.report {
        let report = PosterizeReport::from_image(&posterized)?;
        fs::write(path, serde_json::to_vec(&report)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

fn average(swatches: &[PathBuf]) -> Result<()> {
    let mut stdout = stdout().lock();
    for swatch in average_files(swatches) {
        writeln!(stdout, "{}\t{}", swatch.path.display(), color_to_hex(swatch.color))?;
    }
    Ok(())
}

fn rank(palette: &Path) -> Result<()> {
    let ranked = rank_palette(&read_palette_file(palette)?)?;
    let mut stdout = stdout().lock();
    for (order, hex) in ranked.iter().enumerate() {
        writeln!(stdout, "{order}\t{hex}")?;
    }
    Ok(())
}

fn run(command: &Command) -> Result<()> {
    match command {
        Command::Posterize(args) => posterize(args),
        Command::Average { swatches } => average(swatches),
        Command::Rank { palette } => rank(palette),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stitchfair=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
