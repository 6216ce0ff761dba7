mod calibrate;
mod capture;
mod color;
mod draw;
mod input;
mod palette;
mod shared;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::calibrate::Calibrator;
use crate::capture::Screenshotter;
use crate::draw::Drawer;
use crate::input::{ClickKind, InputHub, RdevPointer};
use crate::palette::{Palette, PaletteConfig};
use crate::shared::constants;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calibrate against the target app, then draw an image with clicks
    Draw {
        /// Image file to draw
        #[arg(short, long)]
        input: PathBuf,
        /// Drawing width in canvas pixels (height follows aspect ratio)
        #[arg(short, long, default_value_t = constants::DEFAULT_IMG_WIDTH)]
        width: u32,
        /// Palette config file (JSON); defaults to the built-in palette
        #[arg(short, long)]
        palette: Option<PathBuf>,
        /// Pause after each synthetic input event, in milliseconds
        #[arg(long, default_value_t = constants::DEFAULT_CLICK_DELAY_MS)]
        click_delay_ms: u64,
        /// Give up on a calibration click after this many seconds
        /// (default: wait forever)
        #[arg(long)]
        click_timeout_secs: Option<u64>,
        /// Use press-only draw clicks for canvases that latch on button-down
        #[arg(long, default_value_t = false)]
        press_only: bool,
    },
    /// Quantize an image against the palette and write a PNG preview
    Preview {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long, default_value_t = constants::DEFAULT_IMG_WIDTH)]
        width: u32,
        #[arg(short, long)]
        palette: Option<PathBuf>,
        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print connected display geometry as JSON
    Screens,
}

fn main() -> Result<()> {
    utils::logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Draw {
            input,
            width,
            palette,
            click_delay_ms,
            click_timeout_secs,
            press_only,
        } => run_draw(
            &input,
            width,
            palette.as_deref(),
            click_delay_ms,
            click_timeout_secs.map(Duration::from_secs),
            press_only,
        ),
        Commands::Preview {
            input,
            width,
            palette,
            output,
        } => run_preview(&input, width, palette.as_deref(), &output),
        Commands::Screens => run_screens(),
    }
}

fn load_scaled_image(input: &std::path::Path, width: u32) -> Result<image::RgbImage> {
    let img = image::open(input)
        .with_context(|| format!("failed to load image {}", input.display()))?
        .to_rgb8();
    draw::rescale(&img, width)
}

fn run_draw(
    input: &std::path::Path,
    width: u32,
    palette_path: Option<&std::path::Path>,
    click_delay_ms: u64,
    click_timeout: Option<Duration>,
    press_only: bool,
) -> Result<()> {
    let config = PaletteConfig::load(palette_path)?;
    let targets = config.target_colors()?;
    let scaled = load_scaled_image(input, width)?;
    println!(
        "🎨 Drawing {} at {}x{} with a {}-color palette",
        input.display(),
        scaled.width(),
        scaled.height(),
        targets.len()
    );

    let hub = InputHub::start()?;
    let calibrator = Calibrator::new(&hub, click_timeout);

    let origin = calibrator.calibrate_origin()?;
    let region = calibrator.capture_palette_region()?;
    let mapping = calibrator.build_palette_mapping(&targets, region, &Screenshotter)?;
    let mut palette = Palette::new(&targets, &mapping)?;

    let draw_click = if press_only {
        ClickKind::PressOnly
    } else {
        ClickKind::Full
    };
    let mut pointer = RdevPointer::new(click_delay_ms);
    let mut drawer = Drawer::new(origin, draw_click);

    println!("🖌️  Drawing starts now. Press Escape (or Ctrl+C) to cancel.");
    let watch = hub.watch_escape();
    let ctrlc_token = watch.token().clone();
    ctrlc::set_handler(move || {
        ctrlc_token.cancel();
    })?;

    drawer.draw(&scaled, &mut palette, &mut pointer, watch.token())?;
    drop(watch);
    Ok(())
}

fn run_preview(
    input: &std::path::Path,
    width: u32,
    palette_path: Option<&std::path::Path>,
    output: &std::path::Path,
) -> Result<()> {
    let config = PaletteConfig::load(palette_path)?;
    let targets = config.target_colors()?;
    let scaled = load_scaled_image(input, width)?;

    let palette = Palette::unmapped(&targets)?;
    let preview = draw::preview::quantize_image(&scaled, &palette)?;
    preview
        .save(output)
        .with_context(|| format!("failed to write preview {}", output.display()))?;
    println!(
        "✅ Preview written to {} ({}x{})",
        output.display(),
        preview.width(),
        preview.height()
    );
    Ok(())
}

#[derive(Serialize)]
struct DisplayReport {
    id: u32,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    scale_factor: f32,
    is_primary: bool,
}

fn run_screens() -> Result<()> {
    let screens = screenshots::Screen::all().context("failed to enumerate displays")?;
    let reports: Vec<DisplayReport> = screens
        .iter()
        .map(|s| DisplayReport {
            id: s.display_info.id,
            x: s.display_info.x,
            y: s.display_info.y,
            width: s.display_info.width,
            height: s.display_info.height,
            scale_factor: s.display_info.scale_factor,
            is_primary: s.display_info.is_primary,
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}
