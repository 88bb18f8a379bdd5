//! Turns a single market snapshot page into a `ReportRecord`.

use log::{info, warn};
use scraper::{Html, Selector};

use crate::dataset::ReportRecord;
use crate::error::SkipReason;
use crate::fetch::PageSource;
use crate::rules::{rule_for, Field};

/// The rich-text block holding the report narrative.
pub const CONTENT_SELECTOR: &str = "div.o-wysiwyg";

#[derive(Debug)]
pub enum ReportOutcome {
    Extracted(ReportRecord),
    Skipped {
        week_ending: String,
        url: String,
        reason: SkipReason,
    },
}

/// The plain text of the report's content block, if the page has one.
pub fn content_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let content_selector = Selector::parse(CONTENT_SELECTOR).unwrap();
    document
        .select(&content_selector)
        .next()
        .map(|element| element.text().collect::<String>())
}

/// Build a record from report text. Fields that no rule matches stay `None`.
pub fn record_from_text(text: &str, url: &str, week_ending: &str) -> ReportRecord {
    let value = |field| rule_for(field).extract(text);

    ReportRecord {
        week_ending: week_ending.to_string(),
        sales_transactions: value(Field::SalesTransactions),
        stock_for_sale: value(Field::StockForSale),
        properties_for_rent: value(Field::PropertiesForRent),
        properties_leased: value(Field::PropertiesLeased),
        source: url.to_string(),
    }
}

pub fn parse_report(html: &str, url: &str, week_ending: &str) -> Result<ReportRecord, SkipReason> {
    let text = content_text(html).ok_or(SkipReason::MissingContent)?;
    Ok(record_from_text(&text, url, week_ending))
}

/// Fetch and parse one report. Failures are returned as a skip, never
/// propagated.
pub fn extract_report<S: PageSource + ?Sized>(
    source: &S,
    url: &str,
    week_ending: &str,
) -> ReportOutcome {
    let result = source
        .fetch(url)
        .map_err(SkipReason::from)
        .and_then(|html| {
            info!("Processing report: {}", week_ending);
            parse_report(&html, url, week_ending)
        });

    match result {
        Ok(record) => {
            info!(
                " - Extracted sales transactions: {}",
                record.sales_transactions.as_deref().unwrap_or("none")
            );
            ReportOutcome::Extracted(record)
        }
        Err(reason) => {
            warn!("Skipping report {} ({}): {}", week_ending, url, reason);
            ReportOutcome::Skipped {
                week_ending: week_ending.to_string(),
                url: url.to_string(),
                reason,
            }
        }
    }
}
