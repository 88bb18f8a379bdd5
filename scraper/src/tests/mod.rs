use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::FetchError;
use crate::fetch::PageSource;

pub mod fixtures;

/// Helper function to log and save failed HTML for future regression testing
pub fn save_failed_html(html: &str, test_name: &str) -> Result<()> {
    // Create tests/fixtures/failures directory if it doesn't exist
    let failures_dir = Path::new("src/tests/fixtures/failures");
    fs::create_dir_all(failures_dir)?;

    // Save the HTML for further analysis
    let file_path = failures_dir.join(format!("{}.html", test_name));
    fs::write(&file_path, html)?;

    println!("Saved failed HTML to {}", file_path.display());
    Ok(())
}

/// Serves canned pages by URL and records every request in order.
/// Unknown URLs answer 404.
#[derive(Default)]
pub struct FakeSite {
    pages: HashMap<String, String>,
    failures: HashMap<String, u16>,
    requests: RefCell<Vec<String>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    pub fn failing(mut self, url: &str, status: u16) -> Self {
        self.failures.insert(url.to_string(), status);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl PageSource for FakeSite {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requests.borrow_mut().push(url.to_string());

        if let Some(status) = self.failures.get(url) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            });
        }

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}
