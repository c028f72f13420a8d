//! mask-scanner - Identify respirator masks from noisy OCR text
//!
//! Command line front-end: replay recorded OCR ticks, run closest-name
//! lookups, or inspect how raw text is tokenized.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use mask_scanner::app::ScanWorker;
use mask_scanner::catalog::loader::load_catalog;
use mask_scanner::catalog::Catalog;
use mask_scanner::config::{self, AppConfig};
use mask_scanner::search::{find_closest, ClosestMode, ClosestResult};
use mask_scanner::shared::ScanEvent;
use mask_scanner::storage;
use mask_scanner::text::expand;
use mask_scanner::vision::TextObservation;

/// Time to wait for the worker to process a single tick
const TICK_TIMEOUT: Duration = Duration::from_secs(10);

/// mask-scanner - Identify masks from OCR text
#[derive(Parser, Debug)]
#[command(name = "mask-scanner")]
#[command(about = "Identify respirator masks from noisy OCR text")]
struct Args {
    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay recorded OCR ticks and print the guess after each one
    Scan {
        /// Catalog JSON file
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// File with one JSON array of observations per line
        #[arg(long)]
        ticks: PathBuf,
    },
    /// Find the catalog entries closest to the given snippets
    Closest {
        /// Catalog JSON file
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Which names to compare against
        #[arg(long, value_enum, default_value_t = ClosestMode::Model)]
        mode: ClosestMode,
        /// Snippets to look up
        #[arg(required = true)]
        snippets: Vec<String>,
        /// Model snippets for the second stage of company-model lookups
        #[arg(long = "model")]
        model_snippets: Vec<String>,
        /// Number of results
        #[arg(short)]
        n: Option<usize>,
    },
    /// Print the search tokens derived from raw text
    Tokens {
        #[arg(required = true)]
        texts: Vec<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_or_create_config(args.config.as_deref())?;

    match args.command {
        Command::Scan { catalog, ticks } => {
            let catalog = open_catalog(catalog, &config)?;
            run_scan(catalog, config, &ticks)
        }
        Command::Closest {
            catalog,
            mode,
            snippets,
            model_snippets,
            n,
        } => {
            let catalog = open_catalog(catalog, &config)?;
            let n = n.unwrap_or(config.matching.closest_count);
            run_closest(&catalog, mode, &snippets, &model_snippets, n, config.matching.company_shortlist);
            Ok(())
        }
        Command::Tokens { texts } => {
            let tokens = expand(&texts);
            println!("models:    {}", tokens.models.iter().cloned().collect::<Vec<_>>().join(" "));
            println!("companies: {}", tokens.companies.iter().cloned().collect::<Vec<_>>().join(" "));
            Ok(())
        }
    }
}

/// Load configuration from the given file, the default file, or defaults
fn load_or_create_config(path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = path {
        let config = config::load_config(path)?;
        info!("Loaded configuration from {:?}", path);
        return Ok(config);
    }

    if let Ok(config_path) = storage::default_config_path() {
        if config_path.exists() {
            if let Ok(config) = config::load_config(&config_path) {
                info!("Loaded configuration from {:?}", config_path);
                return Ok(config);
            }
        }
    }
    info!("Using default configuration");
    Ok(AppConfig::default())
}

/// Catalog from the command line, the config, or the data directory
fn open_catalog(path: Option<PathBuf>, config: &AppConfig) -> Result<Arc<Catalog>> {
    let path = match path.or_else(|| config.catalog.path.clone()) {
        Some(path) => path,
        None => storage::default_catalog_path()?,
    };
    let catalog = load_catalog(&path).with_context(|| format!("Failed to load catalog {}", path.display()))?;
    Ok(Arc::new(catalog))
}

/// Feed every recorded tick through the scan worker
fn run_scan(catalog: Arc<Catalog>, config: AppConfig, ticks: &Path) -> Result<()> {
    let file = std::fs::File::open(ticks).with_context(|| format!("Failed to open ticks {}", ticks.display()))?;
    let worker = ScanWorker::start(catalog, config)?;

    for (line_no, line) in std::io::BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let batch: Vec<TextObservation> = serde_json::from_str(&line)
            .with_context(|| format!("Invalid tick on line {}", line_no + 1))?;

        if !worker.submit(batch) {
            continue;
        }
        loop {
            match worker.events.recv_timeout(TICK_TIMEOUT)? {
                ScanEvent::TickProcessed(report) => {
                    let label = if report.label.is_empty() { "-" } else { report.label.as_str() };
                    println!("tick {:>4}: {}", report.tick, label);
                    break;
                }
                _ => continue,
            }
        }
    }

    let state = worker.state();
    let runtime = state.read().runtime.clone();
    info!(
        "Scan finished after {} ticks ({} dropped)",
        runtime.ticks_processed, runtime.dropped_ticks
    );
    Ok(())
}

fn run_closest(
    catalog: &Catalog,
    mode: ClosestMode,
    snippets: &[String],
    model_snippets: &[String],
    n: usize,
    company_shortlist: usize,
) {
    match find_closest(catalog, mode, snippets, model_snippets, n, company_shortlist) {
        ClosestResult::Masks(matches) => {
            for m in matches {
                if let Some(mask) = catalog.mask(m.mask) {
                    println!("{:.4}  {}  ({})", m.distance, mask, m.snippet);
                }
            }
        }
        ClosestResult::Companies(matches) => {
            for m in matches {
                if let Some(company) = catalog.company(m.company) {
                    println!("{:.4}  {}  ({})", m.distance, company, m.snippet);
                }
            }
        }
    }
}
