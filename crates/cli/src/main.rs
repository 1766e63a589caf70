//! tonefill - fill the dark or light regions of an image with text
//!
//! Reads an image and a text, lays the text out line by line inside the
//! chosen tonal regions, and writes the result as SVG or as a JSON
//! placement plan.

mod config;
mod render;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use image::imageops::{self, FilterType};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use tonefill_core::metrics::{StandardFont, WidthTable};
use tonefill_core::params::FillParams;
use tonefill_core::pipeline::{Layout, fill_stream};
use tonefill_core::raster::Raster;
use tonefill_core::region::RegionMap;
use tonefill_core::text::{prepare_stream, repeat_stream};

use config::{FileConfig, RunConfig, TargetTone};
use render::Style;

/// Output format.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputType {
    /// SVG drawing (default)
    Svg,
    /// JSON placement plan
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "tonefill")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image whose tones define the fill regions
    image: PathBuf,

    /// File holding the text to lay out
    #[arg(short = 'T', long = "text-file", conflicts_with = "text")]
    text_file: Option<PathBuf>,

    /// Text to lay out
    #[arg(long)]
    text: Option<String>,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Type of output to generate (inferred from the output extension)
    #[arg(short = 't', long = "output-type", value_enum)]
    output_type: Option<OutputType>,

    /// JSON file with default settings; flags take precedence
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    // === Region options ===
    /// Tone threshold in [0, 1]; cells at or below it are dark
    #[arg(long)]
    threshold: Option<f64>,

    /// Fill the light regions instead of the dark ones
    #[arg(short = 'l', long, action = ArgAction::SetTrue)]
    light: bool,

    /// Offset of the fill area; negative keeps text away from edges
    #[arg(short = 'b', long, allow_negative_numbers = true)]
    buffer: Option<f64>,

    /// Number of raster columns the image is resampled to
    #[arg(short = 'g', long)]
    grid: Option<usize>,

    // === Page options ===
    /// Output width in points
    #[arg(short = 'W', long)]
    width: Option<f64>,

    /// Output height in points (follows the image aspect if only the width
    /// is given)
    #[arg(short = 'H', long)]
    height: Option<f64>,

    // === Text options ===
    /// Font face: helvetica or courier
    #[arg(short = 'f', long)]
    font: Option<String>,

    /// Font size in points
    #[arg(short = 's', long = "font-size")]
    font_size: Option<f64>,

    /// Line height as a multiple of the font size
    #[arg(short = 'L', long = "line-spacing")]
    line_spacing: Option<f64>,

    /// Repeat the text until it can fill every slot
    #[arg(short = 'r', long, action = ArgAction::SetTrue)]
    repeat: bool,

    /// Consume runs of spaces instead of skipping slots they block
    #[arg(long = "consume-spaces", action = ArgAction::SetTrue)]
    consume_spaces: bool,

    /// Do not widen spaces when justifying
    #[arg(long = "no-space-justify", action = ArgAction::SetTrue)]
    no_space_justify: bool,

    /// Outline the slots in the output
    #[arg(long = "show-slots", action = ArgAction::SetTrue)]
    show_slots: bool,
}

impl Args {
    /// Settings given on the command line.
    fn overrides(&self) -> FileConfig {
        FileConfig {
            threshold: self.threshold,
            target: self.light.then_some(TargetTone::Light),
            buffer: self.buffer,
            width: self.width,
            height: self.height,
            grid: self.grid,
            font: self.font.clone(),
            font_size: self.font_size,
            line_spacing: self.line_spacing,
            repeat: self.repeat.then_some(true),
            consume_spaces: self.consume_spaces.then_some(true),
            justify_spaces: self.no_space_justify.then_some(false),
        }
    }
}

/// Infer output type from file extension.
fn infer_output_type(path: &str) -> Option<OutputType> {
    let path_lower = path.to_lowercase();
    if path_lower.ends_with(".json") {
        Some(OutputType::Json)
    } else if path_lower.ends_with(".svg") {
        Some(OutputType::Svg)
    } else {
        None
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Decodes `path` and resamples it to `grid` columns of tones. Rows follow
/// the image aspect ratio. Returns the raster and the image's height/width.
fn load_raster(path: &Path, grid: usize) -> Result<(Raster, f64)> {
    let img = image::open(path)
        .with_context(|| format!("failed to decode image {}", path.display()))?;
    let luma = img.to_luma8();
    let (w, h) = luma.dimensions();
    if w == 0 || h == 0 {
        bail!("image {} is empty", path.display());
    }
    let aspect = f64::from(h) / f64::from(w);
    let cols = grid.min(w as usize).max(1);
    let rows = ((cols as f64 * aspect).round() as usize).max(1);
    let resized = imageops::resize(&luma, cols as u32, rows as u32, FilterType::Triangle);
    debug!(width = w, height = h, cols, rows, "resampled image");
    let raster = Raster::from_luma(cols, rows, resized.as_raw())?;
    Ok((raster, aspect))
}

fn read_text(args: &Args) -> Result<String> {
    match (&args.text, &args.text_file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read text {}", path.display())),
        (None, None) => bail!("no text given, use --text or --text-file"),
    }
}

/// Most characters a repeated text is grown to.
const MAX_REPEAT_CHARS: usize = 1_000_000;

/// Characters the page can hold at most: every scanline filled edge to edge
/// with the narrowest glyph. Capped at `MAX_REPEAT_CHARS`.
fn repeat_capacity(params: &FillParams, narrowest: f64) -> usize {
    let lines = (params.height / params.line_height + 0.5).floor();
    if lines < 1.0 {
        return 0;
    }
    if narrowest <= 0.0 {
        return MAX_REPEAT_CHARS;
    }
    let capacity = lines * (params.width / narrowest).floor();
    if capacity >= MAX_REPEAT_CHARS as f64 {
        MAX_REPEAT_CHARS
    } else {
        capacity as usize
    }
}

/// A layout with nothing placed, for runs whose usable area vanished.
fn empty_layout(run: &RunConfig, stream: Vec<char>) -> Layout {
    Layout {
        width: run.params.width,
        height: run.params.height,
        regions: RegionMap {
            regions: Vec::new(),
            target: Default::default(),
            non_target: Default::default(),
        },
        usable: Default::default(),
        slots: Vec::new(),
        placements: Vec::new(),
        lines: Vec::new(),
        stream,
        consumed: 0,
    }
}

fn run(args: &Args) -> Result<()> {
    let file_cfg = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let cfg = args.overrides().or(file_cfg);
    let grid = cfg.grid.unwrap_or(config::DEFAULT_GRID).max(1);

    let (raster, aspect) = load_raster(&args.image, grid)?;
    let run = RunConfig::resolve(cfg, aspect)?;

    let text = read_text(args)?;
    let mut stream = prepare_stream(&text);
    let font = StandardFont::new(run.face, run.font_size);
    if run.repeat {
        let narrowest = WidthTable::build(&stream, &font)?.min_width();
        let capacity = repeat_capacity(&run.params, narrowest);
        if capacity == MAX_REPEAT_CHARS {
            warn!(capacity, "repeated text capped");
        }
        stream = repeat_stream(&stream, capacity);
    }

    let layout = match fill_stream(&raster, stream.clone(), &run.params, &font) {
        Ok(layout) => layout,
        Err(e) if e.is_empty_area() => {
            warn!("{e}; writing an empty layout");
            empty_layout(&run, stream)
        }
        Err(e) => return Err(e.into()),
    };
    info!(
        slots = layout.slots.len(),
        placed = layout.placements.len(),
        consumed = layout.consumed,
        total = layout.total(),
        "layout finished"
    );
    if layout.remaining() > 0 {
        eprintln!(
            "{} of {} characters did not fit",
            layout.remaining(),
            layout.total()
        );
    }

    let output_type = args
        .output_type
        .or_else(|| infer_output_type(&args.outfile))
        .unwrap_or(OutputType::Svg);
    let style = Style {
        face: run.face,
        font_size: run.font_size,
        show_slots: args.show_slots,
    };

    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("failed to create output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };
    match output_type {
        OutputType::Svg => output.write_all(render::svg(&layout, &style).as_bytes())?,
        OutputType::Json => render::json(&layout, &style, &mut output)?,
    }
    output.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
