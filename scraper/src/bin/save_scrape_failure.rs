use anyhow::{Context, Result};
use reiwa_snapshot_scraper::fetch_html;
use reiwa_snapshot_scraper::report::content_text;
use reiwa_snapshot_scraper::rules::rules;
use std::env;
use std::fs;
use std::path::Path;

fn main() -> Result<()> {
    // Get URL from command line arguments
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Please provide a report URL and a test name");
        eprintln!("Usage: cargo run --bin save_scrape_failure <URL> <test_name>");
        std::process::exit(1);
    }

    let url = &args[1];
    let test_name = &args[2];

    println!("Fetching HTML from {}...", url);
    let html = fetch_html(url).context("Failed to fetch report page")?;

    // Create failures directory if it doesn't exist
    let failures_dir = Path::new("src/tests/fixtures/failures");
    fs::create_dir_all(failures_dir).context("Failed to create failures directory")?;

    // Save the HTML for testing
    let file_path = failures_dir.join(format!("{}.html", test_name));
    fs::write(&file_path, &html).context("Failed to write HTML file")?;

    println!(
        "Saved HTML to {} for regression testing",
        file_path.display()
    );

    let text = match content_text(&html) {
        Some(text) => text,
        None => {
            println!("No content container on this page - structural issue");
            return Ok(());
        }
    };

    println!("\nRule results:");
    let mut missing = 0;
    for rule in rules() {
        match rule.find(&text) {
            Some(found) => println!(
                "  - {}: {:?} via {} pattern",
                rule.field,
                found.value(),
                found.tier
            ),
            None => {
                missing += 1;
                println!("  - {}: no match", rule.field);
            }
        }
    }

    if missing == 0 {
        println!("\nEvery field matched. This may not be a failure case.");
    } else {
        println!(
            "\n{} field(s) unmatched. This page will be included in regression tests.",
            missing
        );
    }

    Ok(())
}
