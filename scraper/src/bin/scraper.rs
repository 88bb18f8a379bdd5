use anyhow::{Context, Result};
use clap::Parser;
use reiwa_snapshot_scraper::{run, Config, FlushOutcome, HttpPageSource, WalkEnd};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

static STOP_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Collect the weekly Perth market snapshot figures into a CSV file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Site origin that archive and report links are resolved against
    #[arg(long)]
    base_url: Option<String>,

    /// Archive listing path and query, with {page} for the page number
    #[arg(long)]
    listing_template: Option<String>,

    /// Output CSV file (overwritten)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Seconds to wait between archive pages
    #[arg(long)]
    delay_secs: Option<u64>,

    /// First archive page to fetch
    #[arg(long)]
    start_page: Option<u32>,
}

impl Cli {
    fn into_config(self) -> Config {
        let defaults = Config::default();
        Config {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            listing_template: self.listing_template.unwrap_or(defaults.listing_template),
            output: self.output.unwrap_or(defaults.output),
            delay: self
                .delay_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.delay),
            start_page: self.start_page.unwrap_or(defaults.start_page),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().into_config();

    ctrlc::set_handler(|| STOP_REQUESTED.store(true, Ordering::Relaxed))
        .context("Failed to install Ctrl-C handler")?;

    let source = HttpPageSource::new();
    let summary = run(&source, &config, &STOP_REQUESTED)
        .with_context(|| format!("Failed to save data to {}", config.output.display()))?;

    match &summary.walk.end {
        WalkEnd::EndOfArchive { page } => println!("\nReached the end of the archive at page {}", page),
        WalkEnd::Interrupted { page } => println!("\nProcess stopped by user at page {}", page),
        WalkEnd::Aborted { page, error } => {
            println!("\nCritical error on archive page {}: {}", page, error)
        }
    }
    println!(
        "Visited {} archive pages, found {} reports, skipped {}",
        summary.walk.pages_visited, summary.walk.reports_found, summary.walk.reports_skipped
    );

    match summary.flush {
        FlushOutcome::Written { path, records } => {
            println!("SUCCESS: Data saved to {} with {} records.", path.display(), records)
        }
        FlushOutcome::Empty => println!("Finished. No data extracted."),
    }

    Ok(())
}
