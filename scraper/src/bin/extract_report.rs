use anyhow::{Context, Result};
use reiwa_snapshot_scraper::{extract_report, HttpPageSource, ReportOutcome};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Get URL and week-ending label from command line arguments
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!("Please provide a report URL and its week-ending label");
        eprintln!("Usage: cargo run --bin extract_report <URL> <WEEK_ENDING>");
        eprintln!(
            "Example: cargo run --bin extract_report https://reiwa.com.au/the-wa-market/news/perth-market-snapshot/ \"7 June 2024\""
        );
        std::process::exit(1);
    }

    let url = &args[1];
    let week_ending = &args[2];

    match extract_report(&HttpPageSource::new(), url, week_ending) {
        ReportOutcome::Extracted(record) => {
            let json = serde_json::to_string_pretty(&record)
                .context("Failed to serialize report record")?;
            println!("{}", json);
            Ok(())
        }
        ReportOutcome::Skipped { reason, .. } => {
            Err(anyhow::anyhow!("No record for {}: {}", week_ending, reason))
        }
    }
}
