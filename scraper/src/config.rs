use std::path::PathBuf;
use std::time::Duration;

use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://reiwa.com.au";

pub const DEFAULT_LISTING_TEMPLATE: &str = "/the-wa-market/resources/?terms=Perth+Market+Snapshot+for+the+week+ending&types=news&sortBy=date-desc&page={page}";

pub const DEFAULT_OUTPUT: &str = "data.csv";

/// Pause between archive pages.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

const PAGE_PLACEHOLDER: &str = "{page}";

/// Everything a run needs to know about the source site and the output file.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    /// Path and query of the archive listing, with `{page}` where the page
    /// number goes. Without a placeholder the number is appended.
    pub listing_template: String,
    pub output: PathBuf,
    pub delay: Duration,
    pub start_page: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            listing_template: DEFAULT_LISTING_TEMPLATE.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            delay: DEFAULT_DELAY,
            start_page: 1,
        }
    }
}

impl Config {
    pub fn listing_url(&self, page: u32) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.listing_template.contains(PAGE_PLACEHOLDER) {
            format!(
                "{}{}",
                base,
                self.listing_template
                    .replace(PAGE_PLACEHOLDER, &page.to_string())
            )
        } else {
            format!("{}{}{}", base, self.listing_template, page)
        }
    }

    /// Resolve a report href found on a listing page. Falls back to plain
    /// concatenation when the base URL does not parse.
    pub fn report_url(&self, href: &str) -> String {
        match Url::parse(&self.base_url).and_then(|base| base.join(href)) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}{}", self.base_url.trim_end_matches('/'), href),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_listing_url() {
        let config = Config::default();
        assert_eq!(
            config.listing_url(3),
            "https://reiwa.com.au/the-wa-market/resources/?terms=Perth+Market+Snapshot+for+the+week+ending&types=news&sortBy=date-desc&page=3"
        );
    }

    #[test]
    fn test_listing_template_without_placeholder() {
        let config = Config {
            base_url: "https://example.com/".to_string(),
            listing_template: "/news?page=".to_string(),
            ..Config::default()
        };
        assert_eq!(config.listing_url(12), "https://example.com/news?page=12");
    }

    #[test]
    fn test_report_url_resolution() {
        let config = Config::default();
        assert_eq!(
            config.report_url("/the-wa-market/news/perth-market-snapshot/"),
            "https://reiwa.com.au/the-wa-market/news/perth-market-snapshot/"
        );
        assert_eq!(
            config.report_url("https://other.example/report"),
            "https://other.example/report"
        );
    }
}
