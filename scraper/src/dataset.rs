//! The accumulated output of a run and its one-shot CSV flush.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use crate::error::FlushError;

/// One row of the output table. Column names and order are fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRecord {
    #[serde(rename = "Week Ending")]
    pub week_ending: String,

    #[serde(rename = "Sales Transactions")]
    pub sales_transactions: Option<String>,

    #[serde(rename = "Stock for Sale")]
    pub stock_for_sale: Option<String>,

    #[serde(rename = "Properties for Rent")]
    pub properties_for_rent: Option<String>,

    #[serde(rename = "Properties Leased")]
    pub properties_leased: Option<String>,

    #[serde(rename = "Source")]
    pub source: String,
}

pub const COLUMNS: [&str; 6] = [
    "Week Ending",
    "Sales Transactions",
    "Stock for Sale",
    "Properties for Rent",
    "Properties Leased",
    "Source",
];

/// Append-only, insertion-ordered. Duplicate reports are kept as duplicate rows.
#[derive(Debug, Default)]
pub struct Dataset {
    records: Vec<ReportRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushOutcome {
    Written { path: PathBuf, records: usize },
    /// Nothing was collected, so no file was created or overwritten.
    Empty,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ReportRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ReportRecord] {
        &self.records
    }

    /// Write every record to `path`, replacing whatever was there. Consumes
    /// the dataset: a run flushes exactly once.
    pub fn flush(self, path: &Path) -> Result<FlushOutcome, FlushError> {
        if self.records.is_empty() {
            info!("No records collected, leaving {} untouched", path.display());
            return Ok(FlushOutcome::Empty);
        }

        let file = File::create(path).map_err(|source| FlushError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = csv::Writer::from_writer(file);

        for record in &self.records {
            writer.serialize(record).map_err(|source| FlushError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
        }
        writer.flush().map_err(|source| FlushError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Saved {} records to {}", self.records.len(), path.display());
        Ok(FlushOutcome::Written {
            path: path.to_path_buf(),
            records: self.records.len(),
        })
    }
}
