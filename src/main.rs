use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

use watch_scraper::config::{Config, DEFAULT_CONFIG_PATH};
use watch_scraper::{harness, logging, ExtractionPipeline};

#[derive(Parser)]
#[command(name = "watch_scraper")]
#[command(about = "Extract brand, year and description from saved watch listings")]
#[command(version)]
struct Cli {
    /// Path to the TOML config file (optional)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one record from a saved product page
    Extract {
        /// Product page HTML
        #[arg(long)]
        page: PathBuf,
        /// Listing card HTML or text the page was linked from
        #[arg(long)]
        snippet: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
    /// Extract every `*.html` page in a directory, pairing `<stem>.snippet.html`
    Batch {
        #[arg(long)]
        dir: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    let _guard = logging::init_logging(&config.logging, cli.verbose);
    debug!(?config, "Loaded configuration");

    let pipeline = ExtractionPipeline::from_config(&config.extraction)?;

    match cli.command {
        Commands::Extract { page, snippet, pretty } => {
            let listing = harness::load_listing(&page, snippet.as_deref())
                .with_context(|| format!("reading {}", page.display()))?;
            let extraction = pipeline.extract_with_report(&listing);
            for issue in &extraction.issues {
                info!(page = %page.display(), "{}", issue);
            }
            print_json(&extraction.record, pretty)?;
        }
        Commands::Batch { dir, pretty } => {
            let records = harness::extract_dir(&pipeline, &dir)
                .with_context(|| format!("extracting listings in {}", dir.display()))?;
            print_json(&records, pretty)?;
        }
    }

    Ok(())
}
