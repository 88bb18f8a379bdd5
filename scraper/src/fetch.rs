use log::debug;
use reqwest::blocking::Client;

use crate::error::FetchError;

/// Where pages come from. The walker and extractor only ever see this trait,
/// so tests can serve canned HTML.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Plain blocking GETs, one at a time, no retries and no timeout.
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new() -> Self {
        HttpPageSource {
            client: Client::new(),
        }
    }
}

impl Default for HttpPageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for HttpPageSource {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
    }
}

/// Convenience wrapper for the one-shot binaries.
pub fn fetch_html(url: &str) -> Result<String, FetchError> {
    HttpPageSource::new().fetch(url)
}
