use anyhow::{Context, Result};
use clap::Parser;
use fqdn_vision::logging::init_logging;
use fqdn_vision::parallel_pipeline::WorkerPool;
use fqdn_vision::{AddressBarLocator, PipelineConfig, TesseractCli};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "batch_tester",
    about = "Run the address-bar locator over a directory of screenshots"
)]
struct Args {
    /// Directory of screenshots.
    dir: PathBuf,

    /// TOML file with pipeline settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Concurrent screenshots (0 = one per CPU).
    #[arg(long, default_value_t = 0)]
    workers: usize,
}

/// Regular files directly inside `dir`, sorted by file name.
fn collect_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

#[tokio::main]
async fn main() -> Result<()> {
    // --- 1. Argument Parsing & Setup ---
    init_logging("info");
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PipelineConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    // --- 2. Pipeline Initialization ---
    let recognizer = TesseractCli::new(config.recognizer.clone());
    let locator = AddressBarLocator::new(config, recognizer)?;
    let pool = WorkerPool::new(locator, args.workers);

    // --- 3. Batch Processing ---
    let paths = collect_images(&args.dir)?;
    info!(images = paths.len(), workers = pool.workers(), "processing {}", args.dir.display());

    let mut found = 0usize;
    for outcome in pool.locate_files(paths).await {
        let name = outcome
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| outcome.path.display().to_string());
        match outcome.result {
            Ok(url) => {
                found += usize::from(url.is_some());
                println!("{} {}", name, url.as_deref().unwrap_or("None"));
            }
            Err(e) => warn!(file = %name, error = %e, "skipped"),
        }
    }

    info!(found, "batch complete");
    Ok(())
}
