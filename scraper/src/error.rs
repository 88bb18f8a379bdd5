use std::path::PathBuf;

use thiserror::Error;

/// A page could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Why a report produced no record.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("could not fetch report page: {0}")]
    Fetch(#[from] FetchError),

    #[error("no content container found")]
    MissingContent,
}

#[derive(Debug, Error)]
pub enum FlushError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize records to {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
