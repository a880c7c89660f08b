// Single-screenshot runner: decode an image file, print the FQDN in its address bar.

use anyhow::{Context, Result};
use clap::Parser;
use fqdn_vision::logging::init_logging;
use fqdn_vision::{AddressBarLocator, PipelineConfig, Raster, TesseractCli};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "fqdn_vision",
    version,
    about = "Read the address-bar FQDN from a browser screenshot"
)]
struct Args {
    /// Screenshot to analyze (any format the `image` crate decodes).
    image: PathBuf,

    /// TOML file with pipeline settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the vertical seed spacing.
    #[arg(long)]
    row_step: Option<usize>,

    /// Override the horizontal seed spacing.
    #[arg(long)]
    col_step: Option<usize>,

    /// Override the minimum candidate height and width.
    #[arg(long)]
    min_block_size: Option<usize>,

    /// Print `{"derived_url": ...}` instead of plain text.
    #[arg(long)]
    json: bool,

    /// Print the candidate blocks as JSON and skip recognition.
    #[arg(long)]
    segments: bool,
}

fn load_config(args: &Args) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(step) = args.row_step {
        config.row_step = step;
    }
    if let Some(step) = args.col_step {
        config.col_step = step;
    }
    if let Some(size) = args.min_block_size {
        config.min_block_height = size;
        config.min_block_width = size;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    init_logging("info");
    let args = Args::parse();

    let config = load_config(&args)?;
    let recognizer = TesseractCli::new(config.recognizer.clone());
    let locator = AddressBarLocator::new(config, recognizer)?;

    let image = image::open(&args.image)
        .with_context(|| format!("decoding {}", args.image.display()))?;
    let raster = Raster::from_dynamic(&image);

    if args.segments {
        let blocks = locator.candidates(&raster);
        println!("{}", serde_json::to_string_pretty(&blocks)?);
        return Ok(());
    }

    let url = locator.locate(&raster)?;
    if args.json {
        println!("{}", serde_json::json!({ "derived_url": url }));
    } else {
        println!("{}", url.as_deref().unwrap_or("None"));
    }
    Ok(())
}
