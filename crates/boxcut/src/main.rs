//! boxcut: punch transparent rectangles into an image from the command line.
//!
//! Stands in for an interactive host. The workflow mirrors the
//! interactive one:
//!
//! 1. `--preview` writes the (possibly downscaled) canvas background so
//!    rectangles can be drawn against it in any drawing surface.
//! 2. The drawing surface's JSON document is passed with `--canvas`; red
//!    (`#ff0000`) rectangles erase, green (`#00ff00`) rectangles restore.
//! 3. The edited image is written at full original resolution as PNG.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin boxcut -- [OPTIONS] <IMAGE_PATH>
//! ```
//!
//! Set `RUST_LOG=debug` to see how each rectangle was rescaled and clipped.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use boxcut_pipeline::{
    CanvasState, CompositeReport, Dimensions, EditSession, EditorConfig, PreviewFilter,
    ScaleContext,
};
use clap::{Parser, ValueEnum};
use serde::Serialize;

/// Apply erase/restore rectangles drawn on a preview to an image.
///
/// Rectangles are given in preview coordinates and are mapped back to the
/// original resolution before being applied, in draw order, to the alpha
/// channel.
#[derive(Parser)]
#[command(name = "boxcut", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    image_path: PathBuf,

    /// Drawing surface JSON document (`{"objects": [...]}`), or `-` for
    /// stdin. Without it nothing is drawn and no output is written.
    #[arg(long, value_name = "JSON_PATH")]
    canvas: Option<PathBuf>,

    /// Where to write the edited PNG.
    #[arg(short, long, default_value = boxcut_export::DOWNLOAD_FILENAME)]
    output: PathBuf,

    /// Write the RGB canvas background (the preview to draw on) here.
    #[arg(long, value_name = "PNG_PATH")]
    preview: Option<PathBuf>,

    /// Widest preview in pixels; wider images are scaled down to it.
    #[arg(long, default_value_t = EditorConfig::DEFAULT_DISPLAY_CAP, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    display_cap: u32,

    /// Preview resampling filter.
    #[arg(long, value_enum, default_value_t = CLI_DEFAULT_FILTER)]
    preview_filter: Filter,

    /// Full editor config as a JSON string.
    ///
    /// When provided, `--display-cap` and `--preview-filter` are ignored.
    /// The JSON must be a valid `EditorConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,

    /// Print the summary as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,
}

/// Preview resampling filter selection.
#[derive(Clone, Copy, ValueEnum)]
enum Filter {
    /// Nearest-neighbor (fastest, blocky).
    Nearest,
    /// Bilinear interpolation (fast, decent quality).
    Triangle,
    /// Bicubic Catmull-Rom (moderate, good quality).
    CatmullRom,
    /// Gaussian (moderate, smooth).
    Gaussian,
    /// Lanczos with 3 lobes (slowest, sharpest).
    Lanczos3,
}

/// Maps a [`PreviewFilter`] to the local CLI [`Filter`] enum.
const fn filter_from_pipeline(f: PreviewFilter) -> Filter {
    match f {
        PreviewFilter::Nearest => Filter::Nearest,
        PreviewFilter::Triangle => Filter::Triangle,
        PreviewFilter::CatmullRom => Filter::CatmullRom,
        PreviewFilter::Gaussian => Filter::Gaussian,
        PreviewFilter::Lanczos3 => Filter::Lanczos3,
    }
}

/// The CLI default filter, derived from [`EditorConfig::DEFAULT_PREVIEW_FILTER`]
/// so the two cannot silently diverge.
const CLI_DEFAULT_FILTER: Filter = filter_from_pipeline(EditorConfig::DEFAULT_PREVIEW_FILTER);

/// Build an [`EditorConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<EditorConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(EditorConfig {
        display_cap: cli.display_cap,
        preview_filter: match cli.preview_filter {
            Filter::Nearest => PreviewFilter::Nearest,
            Filter::Triangle => PreviewFilter::Triangle,
            Filter::CatmullRom => PreviewFilter::CatmullRom,
            Filter::Gaussian => PreviewFilter::Gaussian,
            Filter::Lanczos3 => PreviewFilter::Lanczos3,
        },
    })
}

/// Everything worth reporting about one run.
#[derive(Serialize)]
struct Summary<'a> {
    source: Dimensions,
    scale: &'a ScaleContext,
    /// `None` when nothing was drawn.
    composite: Option<CompositeReport>,
    /// Path the edited PNG was written to, if any.
    output: Option<&'a Path>,
}

impl Summary<'_> {
    fn report(&self) -> String {
        let mut lines = vec![
            format!("Source: {}", self.source),
            format!(
                "Preview: {} (scale factor {:.4})",
                self.scale.display_dimensions(),
                self.scale.scale_factor(),
            ),
        ];
        match self.composite {
            Some(ref composite) => {
                lines.push(String::new());
                lines.push(composite.report());
            }
            None => lines.push("Nothing drawn yet: draw rectangles on the preview.".to_string()),
        }
        if let Some(output) = self.output {
            lines.push(String::new());
            lines.push(format!(
                "{} -> {}",
                boxcut_export::caption(self.source),
                output.display()
            ));
        }
        lines.join("\n")
    }
}

/// Read the canvas document from a file, or stdin for `-`.
fn read_canvas(path: &Path) -> Result<CanvasState, Box<dyn Error>> {
    let json = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| format!("Error reading canvas {}: {e}", path.display()))?
    };
    Ok(CanvasState::from_json(&json)?)
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = config_from_cli(cli)?;

    let image_bytes = std::fs::read(&cli.image_path)
        .map_err(|e| format!("Error reading {}: {e}", cli.image_path.display()))?;
    log::info!(
        "image: {} ({} bytes)",
        cli.image_path.display(),
        image_bytes.len()
    );

    let session = EditSession::load(&image_bytes, &config)?;

    if let Some(ref preview_path) = cli.preview {
        let png = boxcut_export::preview_to_png(&session.canvas_background())?;
        std::fs::write(preview_path, &png)
            .map_err(|e| format!("Error writing preview to {}: {e}", preview_path.display()))?;
        log::info!(
            "preview written to {} ({} bytes)",
            preview_path.display(),
            png.len()
        );
    }

    let canvas = match cli.canvas {
        Some(ref path) => read_canvas(path)?,
        None => CanvasState::default(),
    };
    let rects = canvas.rectangles();

    let (composite, output) = match session.render_with_report(&rects) {
        Some((edited, report)) => {
            let download = boxcut_export::Download::png(&edited)?;
            std::fs::write(&cli.output, &download.bytes)
                .map_err(|e| format!("Error writing {}: {e}", cli.output.display()))?;
            log::info!(
                "{} written to {} ({} bytes)",
                download.mime_type,
                cli.output.display(),
                download.bytes.len()
            );
            (Some(report), Some(cli.output.as_path()))
        }
        None => (None, None),
    };

    let summary = Summary {
        source: session.dimensions(),
        scale: session.scale(),
        composite,
        output,
    };
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary.report());
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
