use anyhow::{Context, Result};
use camp_scrape::config::{RunConfig, load_config};
use camp_scrape::fetch::HttpFetcher;
use camp_scrape::parser::ListingSelectors;
use camp_scrape::pipeline::scrape_listings;
use camp_scrape::store::{PersistOptions, persist, prepare_output_dir};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "camp-scrape", about = "Summer camp listing scraper")]
struct Cli {
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    out_dir: Option<PathBuf>,

    #[arg(long)]
    max_records: Option<usize>,

    #[arg(long)]
    output_file: Option<String>,

    #[arg(long, default_value_t = false)]
    no_extended_stats: bool,

    #[arg(long, default_value_t = false)]
    check_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    if cli.check_config {
        ListingSelectors::compile(&config)?;
        println!("OK: {}", config.scrape.base_url);
        return Ok(());
    }

    let out_dir = prepare_output_dir(&config.output.dir)?;
    init_tracing(&out_dir.join(&config.output.log_file))?;

    run(&config).inspect_err(|err| {
        let message = format!("{err:#}");
        error!(error = %message, "fatal error");
    })
}

fn run(config: &RunConfig) -> Result<()> {
    let selectors = ListingSelectors::compile(config)?;
    let fetcher = HttpFetcher::new(&config.scrape)?;

    let scrape = scrape_listings(config, &selectors, &fetcher);
    info!(
        records = scrape.records.len(),
        pages = scrape.pages_fetched,
        outcome = %scrape.outcome,
        "completed scraping"
    );

    persist(&scrape.records, &PersistOptions::from_config(config));
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<RunConfig> {
    let mut config = load_config(cli.config.as_deref())?;

    if let Some(dir) = &cli.out_dir {
        config.output.dir = dir.clone();
    }
    if let Some(max_records) = cli.max_records {
        config.scrape.max_records = max_records;
    }
    if let Some(name) = &cli.output_file {
        config.output.file_name = Some(name.clone());
    }
    if cli.no_extended_stats {
        config.output.extended_stats = false;
    }

    config.validate()?;
    Ok(config)
}

fn init_tracing(log_path: &Path) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .compact()
                .with_writer(std::io::stdout),
        )
        .with(
            fmt::layer()
                .with_target(false)
                .compact()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .try_init()
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;
    Ok(())
}
